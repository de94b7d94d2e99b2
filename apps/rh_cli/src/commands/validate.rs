// relhydro\apps\rh_cli\src\commands/validate.rs

//! 配置验证命令
//!
//! 依次检查：JSON 语法、字段与取值（`HydroConfig::validate`）、
//! 构建期约束（试构建一个平直时空网格块）。致命问题记为错误，
//! 可以运行但可疑的组合记为警告。

use anyhow::{bail, Context, Result};
use clap::Args;
use rh_config::{EosKind, HydroConfig, ReconstructionKind};
use rh_physics::geometry::Minkowski;
use rh_physics::HydroBuilder;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== RelHydro 配置验证 ===");

    let Some(path) = &args.config else {
        println!("用法: rh_cli validate --config <配置文件> [--strict]");
        return Ok(());
    };

    let mut result = ValidationResult::default();
    validate_config(path, &mut result)?;
    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Result<()> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return Ok(());
    }
    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    if let Err(e) = serde_json::from_str::<serde_json::Value>(&content) {
        result.add_error(format!("JSON 解析错误: {e}"));
        return Ok(());
    }

    let config = match HydroConfig::from_json_str(&content) {
        Ok(config) => config,
        Err(e) => {
            result.add_error(e.to_string());
            return Ok(());
        }
    };
    println!("  ✓ 字段与取值有效");

    if config.eos.kind == EosKind::Tabulated {
        result.add_warning("表格状态方程需要外部提供的表，跳过试构建");
    } else if let Err(e) = HydroBuilder::new(config.clone()).build_local(Minkowski) {
        result.add_error(format!("构建失败: {e}"));
        return Ok(());
    } else {
        println!("  ✓ 可以构建网格块");
    }

    check_warnings(&config, result);
    Ok(())
}

fn check_warnings(config: &HydroConfig, result: &mut ValidationResult) {
    let dim = config.mesh.dimensionality();
    if config.cfl > 1.0 / dim as f64 {
        result.add_warning(format!("{dim} 维非分裂更新时 CFL = {} 大于 1/{dim}，可能不稳定", config.cfl));
    }

    let high_order = matches!(
        config.reconstruction.kind,
        ReconstructionKind::Ppm4 | ReconstructionKind::Ppmx | ReconstructionKind::Wenoz
    );
    if high_order && !config.fofc {
        result.add_warning(format!(
            "{} 重构未启用 FOFC，强激波附近可能出现非物理状态",
            config.reconstruction.kind
        ));
    }

    if config.floors.density > 1e-6 {
        result.add_warning(format!("密度底值 {} 较大，可能影响低密度区精度", config.floors.density));
    }
    if config.primitive_solver.tolerance > 1e-8 {
        result.add_warning(format!("反演容差 {} 较宽松", config.primitive_solver.tolerance));
    }
    if config.excision.enabled {
        result.add_warning("启用了挖除：挖除区由几何提供者标记，rh_cli run 使用的平直时空没有挖除单元");
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!("验证失败：发现 {} 个错误，{} 个警告", result.errors.len(), result.warnings.len())
    }
}
