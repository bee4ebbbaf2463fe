// apps/flb_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示构建、格子与默认配置信息。

use anyhow::Result;
use clap::Args;
use flb_config::SimConfig;
use flb_physics::lattice;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示系统信息
    #[arg(long)]
    pub system: bool,

    /// 显示 D2Q9 格子信息
    #[arg(long)]
    pub lattice: bool,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let show_all = !args.system && !args.lattice && !args.defaults;

    if args.system || show_all {
        print_system_info();
    }
    if args.lattice || show_all {
        println!();
        print_lattice_info();
    }
    if args.defaults || show_all {
        println!();
        print_default_config()?;
    }

    Ok(())
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("FilmLB CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    println!("\n可用精度:");
    println!("  - f32 (单精度): ✓");
    println!("  - f64 (双精度): ✓");

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            println!("\nCPU 特性: AVX2 可用");
        }
        if is_x86_feature_detected!("fma") {
            println!("CPU 特性: FMA 可用");
        }
    }
}

fn print_lattice_info() {
    println!("=== D2Q9 格子 ===");
    println!("离散方向数: {}", lattice::Q);
    println!("声速平方 cs² = {}", lattice::SOUND_SPEED_SQ);
    println!("\n  k   (ex, ey)   w_k        反向");
    for k in 0..lattice::Q {
        println!(
            "  {}   ({:2}, {:2})   {:.6}   {}",
            k,
            lattice::EX[k],
            lattice::EY[k],
            lattice::WEIGHTS[k],
            lattice::OPPOSITE[k]
        );
    }
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    let config = SimConfig::default();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
