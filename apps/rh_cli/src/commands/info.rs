// relhydro\apps\rh_cli\src\commands/info.rs

//! 信息显示命令
//!
//! 列出可选的状态方程、重构、Riemann 求解器、积分器与边界类型，
//! 以及默认配置的 JSON 形式。

use anyhow::{Context, Result};
use clap::Args;
use rh_config::{
    BoundaryKind, EosKind, HydroConfig, IntegratorKind, ReconstructionKind, RiemannSolverKind, SlopeLimiterKind,
    MAX_POLYTROPE_PIECES, MAX_SCALARS,
};
use std::fmt::Display;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示某个配置文件（校验后）的完整内容
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 只显示可选项
    #[arg(long)]
    pub kinds: bool,

    /// 只显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== RelHydro 信息 ===");

    if let Some(path) = &args.config {
        let config =
            HydroConfig::from_file(path).with_context(|| format!("无法加载配置文件 {}", path.display()))?;
        println!("=== 配置 {} ===", path.display());
        print_config(&config)?;
        return Ok(());
    }

    let all = !args.kinds && !args.defaults;
    if args.kinds || all {
        print_kinds();
    }
    if all {
        println!();
    }
    if args.defaults || all {
        println!("=== 默认配置 ===");
        print_config(&HydroConfig::default())?;
    }

    Ok(())
}

fn print_kinds() {
    println!("=== 可选项 ===");
    println!("RelHydro CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    print_list("状态方程", EosKind::ALL);
    print_list("重构", ReconstructionKind::ALL);
    print_list("PLM 限制器", SlopeLimiterKind::ALL);
    print_list("Riemann 求解器", RiemannSolverKind::ALL);
    print_list("时间积分器", IntegratorKind::ALL);
    print_list("边界", BoundaryKind::ALL);

    println!("\n重构所需幽灵层:");
    for kind in ReconstructionKind::ALL {
        println!("  {:<8} {}", kind.as_str(), kind.required_ghosts());
    }

    println!("\n限制:");
    println!("  被动标量上限: {}", MAX_SCALARS);
    println!("  分段多方段数上限: {}", MAX_POLYTROPE_PIECES);
    let restricted: Vec<&str> = RiemannSolverKind::ALL
        .iter()
        .filter(|k| k.requires_flat())
        .map(|k| k.as_str())
        .collect();
    println!("  仅平直时空、绝热、无磁场: {}", restricted.join(", "));
}

fn print_list<T: Display>(label: &str, kinds: &[T]) {
    let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
    println!("{:<16} {}", format!("{label}:"), names.join(" | "));
}

fn print_config(config: &HydroConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("序列化配置失败")?;
    println!("{json}");
    Ok(())
}
