// crates/flb_config/src/sim_config.rs

//! SimConfig - 模拟配置（全 f64）
//!
//! 定义求解器的所有配置参数，使用纯 f64 类型，
//! 在构建模拟时根据 Precision 转换到相应精度。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::precision::Precision;

/// 模拟配置（全 f64）
///
/// 包含一次薄膜模拟的全部参数，使用 f64 存储以便 JSON 序列化。
/// 在构建模拟时，根据 `precision` 字段转换到 f32 或 f64。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// 计算精度
    #[serde(default)]
    pub precision: Precision,

    /// 网格配置
    #[serde(default)]
    pub grid: GridConfig,

    /// 流体参数
    #[serde(default)]
    pub fluid: FluidConfig,

    /// 润湿性参数
    #[serde(default)]
    pub wetting: WettingConfig,

    /// 外力项配置
    #[serde(default)]
    pub forcing: ForcingConfig,

    /// 初始条件
    #[serde(default)]
    pub init: InitConfig,

    /// 运行控制
    #[serde(default)]
    pub run: RunConfig,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

/// 网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// x 方向格点数
    #[serde(default = "default_nx")]
    pub nx: usize,

    /// y 方向格点数
    #[serde(default = "default_ny")]
    pub ny: usize,
}

fn default_nx() -> usize {
    64
}
fn default_ny() -> usize {
    64
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: default_nx(),
            ny: default_ny(),
        }
    }
}

/// 流体参数配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConfig {
    /// BGK 松弛时间 τ
    #[serde(default = "default_tau")]
    pub tau: f64,

    /// 表面张力 γ [lattice units]
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// 动力粘度 μ，缺省时取 (τ − 1/2)/3
    #[serde(default)]
    pub viscosity: Option<f64>,
}

fn default_tau() -> f64 {
    1.0
}
fn default_gamma() -> f64 {
    0.01
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            tau: default_tau(),
            gamma: default_gamma(),
            viscosity: None,
        }
    }
}

/// 润湿性参数配置
///
/// 字段与析出压力 Π(h) = κ(θ)·[(h*/(h+h_c))^n − (h*/(h+h_c))^m] 对应。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WettingConfig {
    /// 平衡接触角，单位为 π（0.5 对应 90°）
    #[serde(default = "default_theta")]
    pub theta: f64,

    /// 长程指数 n
    #[serde(default = "default_n")]
    pub n: u32,

    /// 短程指数 m
    #[serde(default = "default_m")]
    pub m: u32,

    /// 前驱膜厚度 h*
    #[serde(default = "default_h_min")]
    pub h_min: f64,

    /// 数值稳定化偏移 h_c
    #[serde(default = "default_h_crit")]
    pub h_crit: f64,
}

fn default_theta() -> f64 {
    1.0 / 9.0
}
fn default_n() -> u32 {
    9
}
fn default_m() -> u32 {
    3
}
fn default_h_min() -> f64 {
    0.1
}
fn default_h_crit() -> f64 {
    0.05
}

impl Default for WettingConfig {
    fn default() -> Self {
        Self {
            theta: default_theta(),
            n: default_n(),
            m: default_m(),
            h_min: default_h_min(),
            h_crit: default_h_crit(),
        }
    }
}

/// 外力项配置
///
/// 每个子项为 `None` 时不注册对应外力。压力梯度驱动项
/// 始终由求解器自身装配，不在此配置。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForcingConfig {
    /// 滑移摩擦
    #[serde(default)]
    pub slip: Option<SlipConfig>,

    /// 热涨落
    #[serde(default)]
    pub thermal: Option<ThermalConfig>,

    /// 倾斜基底体力 [gx, gy]
    #[serde(default)]
    pub inclination: Option<[f64; 2]>,
}

/// 滑移摩擦配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipConfig {
    /// 滑移长度 δ
    pub delta: f64,

    /// 摩擦项使用的粘度，缺省时沿用流体粘度
    #[serde(default)]
    pub viscosity: Option<f64>,
}

/// 热涨落配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalConfig {
    /// 热能 kBT
    pub kbt: f64,

    /// 随机种子
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

/// 初始条件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InitConfig {
    /// 均匀平膜
    Flat {
        /// 膜厚
        h0: f64,
    },
    /// 正弦扰动平膜
    Perturbed {
        /// 基准膜厚
        h0: f64,
        /// 扰动幅值
        amplitude: f64,
        /// x 方向波数
        waves_x: u32,
        /// y 方向波数
        waves_y: u32,
    },
    /// 前驱膜上的单个球冠液滴
    Droplet {
        /// 底面半径
        radius: f64,
        /// 轮廓接触角，单位为 π
        theta: f64,
        /// 液滴中心 [cx, cy]
        center: [usize; 2],
        /// 前驱膜厚度
        h_precursor: f64,
    },
    /// 两个相切液滴（合并场景）
    TwoDroplets {
        /// 底面半径
        radius: f64,
        /// 轮廓接触角，单位为 π
        theta: f64,
        /// 两液滴中心
        centers: [[usize; 2]; 2],
        /// 前驱膜厚度
        h_precursor: f64,
    },
    /// 沿 y 方向不变的液脊
    Rivulet {
        /// 底面半径
        radius: f64,
        /// 轮廓接触角，单位为 π
        theta: f64,
        /// 液脊中心列
        cx: usize,
        /// 前驱膜厚度
        h_precursor: f64,
    },
}

impl Default for InitConfig {
    fn default() -> Self {
        Self::Flat { h0: 0.5 }
    }
}

/// 运行控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 总步数
    #[serde(default = "default_steps")]
    pub steps: u64,

    /// 日志与时间序列输出间隔 [steps]
    #[serde(default = "default_log_every")]
    pub log_every: u64,

    /// 相对质量漂移容限，超出即中止
    #[serde(default = "default_mass_tolerance")]
    pub mass_tolerance: f64,

    /// 是否使用并行后端
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_steps() -> u64 {
    1000
}
fn default_log_every() -> u64 {
    100
}
fn default_mass_tolerance() -> f64 {
    1e-6
}
fn default_parallel() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            log_every: default_log_every(),
            mass_tolerance: default_mass_tolerance(),
            parallel: default_parallel(),
        }
    }
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 是否写出最终膜厚场 CSV
    #[serde(default = "default_write_height")]
    pub write_height_field: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_write_height() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            write_height_field: default_write_height(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            grid: GridConfig::default(),
            fluid: FluidConfig::default(),
            wetting: WettingConfig::default(),
            forcing: ForcingConfig::default(),
            init: InitConfig::default(),
            run: RunConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SimConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: SimConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 在任何分配发生之前完成全部快速失败检查。
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 网格
        if self.grid.nx == 0 || self.grid.ny == 0 {
            return Err(ConfigError::invalid(
                "grid",
                format!("{}x{}", self.grid.nx, self.grid.ny),
                "网格尺寸必须非零",
            ));
        }

        // 流体
        if !(self.fluid.tau > 0.0) || !self.fluid.tau.is_finite() {
            return Err(ConfigError::invalid("fluid.tau", self.fluid.tau, "必须为正且有限"));
        }
        if self.fluid.gamma < 0.0 || !self.fluid.gamma.is_finite() {
            return Err(ConfigError::invalid(
                "fluid.gamma",
                self.fluid.gamma,
                "必须非负且有限",
            ));
        }
        if let Some(mu) = self.fluid.viscosity {
            if !(mu > 0.0) {
                return Err(ConfigError::invalid("fluid.viscosity", mu, "必须为正"));
            }
        }

        // 润湿性
        if self.wetting.m == 0 {
            return Err(ConfigError::invalid("wetting.m", self.wetting.m, "必须不小于 1"));
        }
        if self.wetting.n <= self.wetting.m {
            return Err(ConfigError::invalid(
                "wetting.n",
                self.wetting.n,
                "必须大于短程指数 m",
            ));
        }
        if !(self.wetting.h_min > 0.0) {
            return Err(ConfigError::invalid(
                "wetting.h_min",
                self.wetting.h_min,
                "必须为正",
            ));
        }
        if self.wetting.h_crit < 0.0 {
            return Err(ConfigError::invalid(
                "wetting.h_crit",
                self.wetting.h_crit,
                "必须非负",
            ));
        }
        if !(0.0..=1.0).contains(&self.wetting.theta) {
            return Err(ConfigError::invalid(
                "wetting.theta",
                self.wetting.theta,
                "必须位于 [0, 1]（单位 π）",
            ));
        }

        // 外力
        if let Some(slip) = &self.forcing.slip {
            if !(slip.delta > 0.0) {
                return Err(ConfigError::invalid("forcing.slip.delta", slip.delta, "必须为正"));
            }
            if let Some(mu) = slip.viscosity {
                if !(mu > 0.0) {
                    return Err(ConfigError::invalid("forcing.slip.viscosity", mu, "必须为正"));
                }
            }
        }
        if let Some(thermal) = &self.forcing.thermal {
            if thermal.kbt < 0.0 || !thermal.kbt.is_finite() {
                return Err(ConfigError::invalid(
                    "forcing.thermal.kbt",
                    thermal.kbt,
                    "必须非负且有限",
                ));
            }
        }
        if let Some([gx, gy]) = self.forcing.inclination {
            if !gx.is_finite() || !gy.is_finite() {
                return Err(ConfigError::invalid(
                    "forcing.inclination",
                    format!("[{gx}, {gy}]"),
                    "分量必须有限",
                ));
            }
        }

        // 初始条件
        self.validate_init()?;

        // 运行控制
        if !(self.run.mass_tolerance > 0.0) {
            return Err(ConfigError::invalid(
                "run.mass_tolerance",
                self.run.mass_tolerance,
                "必须为正",
            ));
        }

        Ok(())
    }

    fn validate_init(&self) -> Result<(), ConfigError> {
        let (nx, ny) = (self.grid.nx, self.grid.ny);
        match &self.init {
            InitConfig::Flat { h0 } => {
                if !(*h0 > 0.0) {
                    return Err(ConfigError::invalid("init.h0", h0, "必须为正"));
                }
            }
            InitConfig::Perturbed { h0, amplitude, .. } => {
                if !(*h0 > 0.0) {
                    return Err(ConfigError::invalid("init.h0", h0, "必须为正"));
                }
                if *amplitude < 0.0 || *amplitude >= *h0 {
                    return Err(ConfigError::invalid(
                        "init.amplitude",
                        amplitude,
                        "必须位于 [0, h0)，否则初始膜厚非正",
                    ));
                }
            }
            InitConfig::Droplet {
                radius,
                theta,
                center,
                h_precursor,
            } => {
                Self::validate_cap("init", *radius, *theta, *h_precursor)?;
                if center[0] >= nx || center[1] >= ny {
                    return Err(ConfigError::invalid(
                        "init.center",
                        format!("[{}, {}]", center[0], center[1]),
                        "必须位于网格内",
                    ));
                }
            }
            InitConfig::TwoDroplets {
                radius,
                theta,
                centers,
                h_precursor,
            } => {
                Self::validate_cap("init", *radius, *theta, *h_precursor)?;
                for c in centers {
                    if c[0] >= nx || c[1] >= ny {
                        return Err(ConfigError::invalid(
                            "init.centers",
                            format!("[{}, {}]", c[0], c[1]),
                            "必须位于网格内",
                        ));
                    }
                }
            }
            InitConfig::Rivulet {
                radius,
                theta,
                cx,
                h_precursor,
            } => {
                Self::validate_cap("init", *radius, *theta, *h_precursor)?;
                if *cx >= nx {
                    return Err(ConfigError::invalid("init.cx", cx, "必须位于网格内"));
                }
            }
        }
        Ok(())
    }

    fn validate_cap(key: &str, radius: f64, theta: f64, h_precursor: f64) -> Result<(), ConfigError> {
        if !(radius > 0.0) {
            return Err(ConfigError::invalid(&format!("{key}.radius"), radius, "必须为正"));
        }
        if !(0.0..=1.0).contains(&theta) {
            return Err(ConfigError::invalid(
                &format!("{key}.theta"),
                theta,
                "必须位于 [0, 1]（单位 π）",
            ));
        }
        if !(h_precursor > 0.0) {
            return Err(ConfigError::invalid(
                &format!("{key}.h_precursor"),
                h_precursor,
                "必须为正",
            ));
        }
        Ok(())
    }
}
