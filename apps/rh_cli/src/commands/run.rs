// relhydro\apps\rh_cli\src\commands/run.rs

//! 运行模拟命令
//!
//! 在单块平直时空上运行内置问题，逐周期推进并汇总诊断计数。
//! 可选地把最终的原始量剖面与诊断写入 JSON 文件。

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use glam::DVec3;
use rh_config::{BoundaryKind, HydroConfig, IntegratorKind, ReconstructionKind, RiemannSolverKind};
use rh_physics::geometry::Minkowski;
use rh_physics::types::{IDN, IPR, IVX};
use rh_physics::{CycleDiagnostics, Driver, HydroBuilder, MeshBlock, Primitive};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// 内置问题
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Problem {
    /// 静止均匀流体（静力平衡回归）
    Uniform,
    /// 相对论激波管（Martí & Müller 问题 1）
    ShockTube,
    /// 周期边界上的平滑密度波
    Wave,
}

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（缺省使用内置问题的默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 内置问题
    #[arg(short, long, value_enum, default_value = "shock-tube")]
    pub problem: Problem,

    /// 结束时刻
    #[arg(short = 't', long, default_value = "0.4")]
    pub t_end: f64,

    /// 最大周期数
    #[arg(long, default_value = "100000")]
    pub max_cycles: u64,

    /// x1 方向单元数（覆盖配置）
    #[arg(long)]
    pub nx: Option<usize>,

    /// 重构方法（覆盖配置）
    #[arg(long)]
    pub recon: Option<ReconstructionKind>,

    /// Riemann 求解器（覆盖配置）
    #[arg(long)]
    pub solver: Option<RiemannSolverKind>,

    /// 时间积分器（覆盖配置）
    #[arg(long)]
    pub integrator: Option<IntegratorKind>,

    /// 启用一阶通量修正
    #[arg(long)]
    pub fofc: bool,

    /// 每隔多少个周期输出一次进度
    #[arg(long, default_value = "50")]
    pub log_every: u64,

    /// 结果 JSON 文件
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 运行汇总
#[derive(Debug, Serialize)]
struct RunSummary {
    problem: Problem,
    config: HydroConfig,
    cycles: u64,
    time: f64,
    wall_seconds: f64,
    mass_initial: f64,
    mass_final: f64,
    totals: CycleDiagnostics,
    /// x1 方向中线上的 (x, ρ, v, P)
    profile: Vec<[f64; 4]>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== RelHydro 模拟启动 ===");

    let config = build_config(&args)?;
    info!(
        "问题: {:?}, 网格: {:?}, 重构: {}, 求解器: {}, 积分器: {}, FOFC: {}",
        args.problem,
        config.mesh.nx,
        config.reconstruction.kind,
        config.riemann_solver,
        config.integrator,
        config.fofc
    );

    let mut block = HydroBuilder::new(config.clone())
        .build_local(Minkowski)
        .context("构建网格块失败")?;
    let init = initial_state(args.problem);
    let nonfinite = block.set_primitives(init);
    if nonfinite > 0 {
        warn!("初值中有 {} 个单元的守恒量非有限", nonfinite);
    }
    let mass_initial = total_mass(block.mesh());

    let mut driver = Driver::new(vec![block]).context("创建驱动器失败")?;
    let start = Instant::now();
    let mut totals = CycleDiagnostics::default();

    while driver.time() < args.t_end && driver.cycle() < args.max_cycles {
        let dt = driver.dt().min(args.t_end - driver.time());
        let diag = driver
            .step_with(dt)
            .with_context(|| format!("周期 {} 推进失败", driver.cycle()))?;
        totals = totals.merge(&diag);
        if args.log_every > 0 && diag.cycle % args.log_every == 0 {
            info!("{}", diag);
        }
    }
    totals.cycle = driver.cycle();
    totals.time = driver.time();

    let elapsed = start.elapsed();
    let mesh = driver.blocks()[0].mesh();
    let mass_final = total_mass(mesh);

    info!("=== 模拟完成 ===");
    info!("周期数: {}, 结束时刻: {:.6}", driver.cycle(), driver.time());
    info!("计算时间: {:.3} s", elapsed.as_secs_f64());
    info!(
        "FOFC 单元: {}, 一阶退回面: {}, 底值: {}, 反演失败: {}",
        totals.fofc_cells,
        totals.fallback_faces,
        totals.floor_corrected(),
        totals.failures
    );
    info!(
        "总质量: {:.12e} -> {:.12e} (相对变化 {:.3e})",
        mass_initial,
        mass_final,
        (mass_final - mass_initial) / mass_initial
    );

    if let Some(path) = &args.output {
        let summary = RunSummary {
            problem: args.problem,
            config,
            cycles: driver.cycle(),
            time: driver.time(),
            wall_seconds: elapsed.as_secs_f64(),
            mass_initial,
            mass_final,
            totals,
            profile: profile(mesh),
        };
        let content = serde_json::to_string_pretty(&summary).context("序列化结果失败")?;
        std::fs::write(path, content).with_context(|| format!("无法写入 {}", path.display()))?;
        info!("结果已写入 {}", path.display());
    }

    Ok(())
}

fn build_config(args: &RunArgs) -> Result<HydroConfig> {
    let mut config = match &args.config {
        Some(path) => HydroConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => problem_defaults(args.problem),
    };

    if let Some(nx) = args.nx {
        config.mesh.nx[0] = nx;
    }
    if let Some(recon) = args.recon {
        config.reconstruction.kind = recon;
        config.mesh.nghost = config.mesh.nghost.max(recon.required_ghosts());
    }
    if let Some(solver) = args.solver {
        config.riemann_solver = solver;
    }
    if let Some(integrator) = args.integrator {
        config.integrator = integrator;
    }
    config.fofc |= args.fofc;

    config.validate().context("配置无效")?;
    Ok(config)
}

fn problem_defaults(problem: Problem) -> HydroConfig {
    let mut config = HydroConfig::default();
    match problem {
        Problem::Uniform => {
            config.mesh.nx = [32, 1, 1];
        }
        Problem::ShockTube => {
            config.mesh.nx = [400, 1, 1];
            config.mesh.x_min[0] = 0.0;
            config.mesh.x_max[0] = 1.0;
            config.mesh.boundaries[0] = BoundaryKind::Outflow;
        }
        Problem::Wave => {
            config.mesh.nx = [128, 1, 1];
            config.mesh.boundaries = [BoundaryKind::Periodic; 3];
            config.integrator = IntegratorKind::Rk3;
        }
    }
    config
}

fn initial_state(problem: Problem) -> fn([f64; 3]) -> (Primitive, DVec3) {
    match problem {
        Problem::Uniform => |_| (Primitive::new(1.0, DVec3::ZERO, 0.1, 0.0), DVec3::ZERO),
        Problem::ShockTube => |x| {
            let prim = if x[0] < 0.5 {
                Primitive::new(10.0, DVec3::ZERO, 40.0 / 3.0, 0.0)
            } else {
                Primitive::new(1.0, DVec3::ZERO, 1.0e-6, 0.0)
            };
            (prim, DVec3::ZERO)
        },
        Problem::Wave => |x| {
            let rho = 1.0 + 0.2 * (2.0 * std::f64::consts::PI * x[0]).sin();
            (Primitive::new(rho, DVec3::new(0.5, 0.0, 0.0), 1.0, 0.0), DVec3::ZERO)
        },
    }
}

/// 活动区守恒密度之和乘以单元体积
fn total_mass(mesh: &MeshBlock) -> f64 {
    let volume: f64 = mesh.active_directions().map(|d| mesh.dx[d.index()]).product();
    mesh.active_range()
        .iter()
        .map(|(k, j, i)| mesh.u0.get(IDN, k, j, i))
        .sum::<f64>()
        * volume
}

fn profile(mesh: &MeshBlock) -> Vec<[f64; 4]> {
    let (k, j) = ((mesh.ks + mesh.ke) / 2, (mesh.js + mesh.je) / 2);
    (mesh.is..=mesh.ie)
        .map(|i| {
            let w = mesh.w0.cell(k, j, i);
            let u = w[IVX];
            [mesh.cell_center(k, j, i)[0], w[IDN], u / (1.0 + u * u).sqrt(), w[IPR]]
        })
        .collect()
}
