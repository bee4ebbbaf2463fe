// apps/flb_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 在不构建模拟的前提下检查配置文件的正确性。

use anyhow::{bail, Context, Result};
use clap::Args;
use flb_config::{InitConfig, SimConfig};
use std::path::PathBuf;
use tracing::{error, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径 (JSON)
    pub config: PathBuf,

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

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    println!("=== FilmLB 配置验证 ===");
    println!("检查配置文件: {}", args.config.display());

    let mut result = ValidationResult::default();

    if !args.config.exists() {
        result.add_error(format!("配置文件不存在: {}", args.config.display()));
        return print_validation_result(&result, args.strict);
    }

    let content = std::fs::read_to_string(&args.config).context("无法读取配置文件")?;

    // JSON 语法
    let config = match serde_json::from_str::<SimConfig>(&content) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(format!("JSON 解析错误: {}", e));
            return print_validation_result(&result, args.strict);
        }
    };
    println!("  ✓ JSON 格式有效");

    // 快速失败检查
    match config.validate() {
        Ok(()) => println!("  ✓ 参数约束满足"),
        Err(e) => result.add_error(e.to_string()),
    }

    // 数值稳定性提示
    collect_warnings(&config, &mut result);

    print_validation_result(&result, args.strict)
}

fn collect_warnings(config: &SimConfig, result: &mut ValidationResult) {
    if config.fluid.tau < 0.55 {
        result.add_warning(format!(
            "tau = {} 接近稳定性下界 1/2，建议 tau >= 0.55",
            config.fluid.tau
        ));
    }
    if config.fluid.tau > 2.0 {
        result.add_warning(format!("tau = {} 较大，界面动力学会被过度阻尼", config.fluid.tau));
    }
    if config.fluid.gamma > 0.1 {
        result.add_warning(format!(
            "gamma = {} 较大，压力梯度可能超出小马赫数假设",
            config.fluid.gamma
        ));
    }
    if let Some(thermal) = &config.forcing.thermal {
        if thermal.kbt > 1e-4 {
            result.add_warning(format!(
                "kbt = {:e} 较大，热涨落可能掩盖确定性动力学",
                thermal.kbt
            ));
        }
    }
    if let InitConfig::Droplet { radius, .. } | InitConfig::TwoDroplets { radius, .. } =
        &config.init
    {
        let max_span = config.grid.nx.min(config.grid.ny) as f64;
        if 2.0 * radius > max_span {
            result.add_warning(format!(
                "液滴直径 {} 超过最短网格边 {}，周期像会自接触",
                2.0 * radius,
                max_span
            ));
        }
    }
    let sites = config.grid.nx.saturating_mul(config.grid.ny);
    if sites > 4_000_000 {
        result.add_warning(format!(
            "网格 {}x{} 共 {} 格点，f64 下 9 个分布平面约需 {} MB",
            config.grid.nx,
            config.grid.ny,
            sites,
            sites * 9 * 8 * 3 / 1_000_000
        ));
    }
    if config.run.steps == 0 {
        result.add_warning("run.steps = 0，模拟不会推进");
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

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
