// apps/flb_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 执行薄膜流动模拟。
//!
//! # 架构说明
//!
//! 本模块属于 Layer 4: Application，遵循零泛型原则：
//! - 使用 `SimConfig` 配置模拟
//! - 通过 `build_simulation` 构建 `Box<dyn DynSimulation>`
//! - 精度通过 `Precision` 枚举选择，无需泛型参数

use anyhow::{Context, Result};
use clap::Args;
use flb_config::{build_simulation, BlockReport, DynSimulation, Precision, SimConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径 (JSON)
    pub config: PathBuf,

    /// 输出目录，覆盖配置中的设置
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 总步数，覆盖配置中的设置
    #[arg(long)]
    pub steps: Option<u64>,

    /// 使用 f32 精度
    #[arg(long)]
    pub f32: bool,

    /// 强制串行后端
    #[arg(long)]
    pub serial: bool,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== FilmLB 模拟启动 ===");

    let mut config = SimConfig::from_file(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;

    // 命令行覆盖（Layer 4 唯一接触精度系统的地方）
    if args.f32 {
        config.precision = Precision::F32;
    }
    if args.serial {
        config.run.parallel = false;
    }
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(output) = args.output {
        config.output.directory = output;
    }

    info!(
        "精度: {}, 网格: {}x{}, 总步数: {}",
        config.precision, config.grid.nx, config.grid.ny, config.run.steps
    );

    let mut sim = build_simulation(&config).context("构建模拟失败")?;
    info!("后端: {}, 格点数: {}", sim.backend_name(), sim.grid_info().sites);

    // 时间序列输出
    std::fs::create_dir_all(&config.output.directory)?;
    let series_path = config.output.directory.join("timeseries.csv");
    let mut series = BufWriter::new(
        File::create(&series_path)
            .with_context(|| format!("无法创建 {}", series_path.display()))?,
    );
    writeln!(series, "step,total_mass,mass_drift,min_height,max_height,max_speed")?;

    let initial = sim.observables();
    write_series_row(&mut series, &initial)?;
    info!("初始质量: {:.6}", initial.total_mass);

    // 运行循环：按日志间隔分块推进
    let start = Instant::now();
    let block = config.run.log_every.max(1);
    let mut aborted = false;

    while sim.step_count() < config.run.steps {
        let remaining = config.run.steps - sim.step_count();
        match sim.advance(remaining.min(block)) {
            Ok(report) => {
                info!(
                    "step {}: mass={:.6} drift={:.2e} h=[{:.4}, {:.4}] v_max={:.3e}",
                    report.step,
                    report.total_mass,
                    report.mass_drift,
                    report.min_height,
                    report.max_height,
                    report.max_speed
                );
                write_series_row(&mut series, &report)?;
            }
            Err(e) => {
                warn!("模拟中止: {}", e);
                aborted = true;
                break;
            }
        }
    }
    series.flush()?;
    let elapsed = start.elapsed();

    let last = sim.observables();
    info!("=== 模拟{} ===", if aborted { "中止" } else { "完成" });
    info!("总步数: {}", sim.step_count());
    info!(
        "计算时间: {:.2} s ({:.0} steps/s)",
        elapsed.as_secs_f64(),
        sim.step_count() as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    info!(
        "最终质量: {:.6} (漂移 {:.2e}), 膜厚范围 [{:.4}, {:.4}]",
        last.total_mass, last.mass_drift, last.min_height, last.max_height
    );

    // 最终膜厚场快照
    if config.output.write_height_field {
        let field_path = config.output.directory.join("height_final.csv");
        write_height_field(&field_path, sim.as_ref())?;
        info!("膜厚场已写出: {}", field_path.display());
    }

    if aborted {
        anyhow::bail!("模拟因质量漂移或数值异常提前中止");
    }
    Ok(())
}

fn write_series_row(w: &mut impl Write, r: &BlockReport) -> Result<()> {
    writeln!(
        w,
        "{},{},{:.3e},{},{},{}",
        r.step, r.total_mass, r.mass_drift, r.min_height, r.max_height, r.max_speed
    )?;
    Ok(())
}

/// 写出行主序的膜厚场矩阵，每行对应一个 y
fn write_height_field(path: &Path, sim: &dyn DynSimulation) -> Result<()> {
    let grid = sim.grid_info();
    let h = sim.export_height();

    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("无法创建 {}", path.display()))?,
    );
    writeln!(w, "# FilmLB height field, {}", chrono::Local::now().to_rfc3339())?;
    writeln!(w, "# nx={} ny={}", grid.nx, grid.ny)?;
    for y in 0..grid.ny {
        let row: Vec<String> = (0..grid.nx)
            .map(|x| h[y * grid.nx + x].to_string())
            .collect();
        writeln!(w, "{}", row.join(","))?;
    }
    w.flush()?;
    Ok(())
}
