// apps/flb_cli/src/main.rs

//! FilmLB 命令行界面
//!
//! 提供薄膜格子 Boltzmann 模拟的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 4: Application**，遵循以下原则：
//! - 零泛型语法：仅使用 `SimConfig` 和 `Box<dyn DynSimulation>`
//! - 通过 `Precision` 枚举选择精度，无需指定类型参数

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// FilmLB 薄膜流动求解器命令行工具
#[derive(Parser)]
#[command(name = "flb")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "FilmLB thin-film lattice Boltzmann solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，RUST_LOG 优先
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志：RUST_LOG 存在时覆盖 --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
