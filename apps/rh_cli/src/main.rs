// relhydro\apps\rh_cli\src/main.rs

//! RelHydro 命令行界面
//!
//! 单块广义相对论（磁）流体更新的命令行工具：运行内置问题、
//! 列出可选项与默认配置、校验配置文件。
//!
//! 库层通过 `log` 门面输出，这里安装的 `tracing-subscriber` 会一并接管。

mod commands;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// RelHydro 相对论流体求解器命令行工具
#[derive(Parser)]
#[command(name = "rh_cli")]
#[command(author = "RelHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "RelHydro general-relativistic (magneto)hydrodynamics block solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)；设置 RUST_LOG 时以其为准
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行内置问题
    Run(commands::run::RunArgs),
    /// 显示可选项与默认配置
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("初始化日志失败: {e}"))?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
