// crates/flb_physics/src/params.rs

//! 求解器物理参数
//!
//! 所有参数在构造后保持只读，求解器仅持有共享引用。参数合法性
//! 通过 [`SystemParams::validate`] 在求解器创建时一次性检查，
//! 时间步内部不再做任何参数校验。

use flb_foundation::{FlbError, LatticeScalar};

// ============================================================
// 润湿性参数
// ============================================================

/// 润湿性参数（接触角与析离压力）
///
/// 析离压力采用幂律形式
///
/// ```text
/// Π(h) = κ(θ)·[(h*/(h+h_c))^n − (h*/(h+h_c))^m]
/// ```
///
/// 其中 κ(θ) 由接触角与两个指数决定，`h*` 为前驱膜厚度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WettingParams<S> {
    /// 平衡接触角，单位为 π（0.5 对应 90°）
    pub theta: S,
    /// 长程指数 n，必须大于 m
    pub n: u32,
    /// 短程指数 m，必须不小于 1
    pub m: u32,
    /// 前驱膜厚度 h*
    pub h_min: S,
    /// 数值稳定化偏移 h_c，允许为零
    pub h_crit: S,
}

impl<S: LatticeScalar> Default for WettingParams<S> {
    fn default() -> Self {
        Self {
            theta: S::from_config(1.0 / 9.0),
            n: 9,
            m: 3,
            h_min: S::from_config(0.1),
            h_crit: S::from_config(0.05),
        }
    }
}

impl<S: LatticeScalar> WettingParams<S> {
    /// 仅指定接触角，其余取默认值
    pub fn with_contact_angle(theta: S) -> Self {
        Self {
            theta,
            ..Self::default()
        }
    }

    /// 验证参数有效性
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.m == 0 {
            return Err(ParamsError::Constraint {
                field: "m",
                constraint: "m >= 1",
            });
        }
        if self.n <= self.m {
            return Err(ParamsError::Constraint {
                field: "n",
                constraint: "n > m",
            });
        }
        if self.h_min <= S::ZERO {
            return Err(ParamsError::Constraint {
                field: "h_min",
                constraint: "h_min > 0",
            });
        }
        if self.h_crit < S::ZERO {
            return Err(ParamsError::Constraint {
                field: "h_crit",
                constraint: "h_crit >= 0",
            });
        }
        if self.theta < S::ZERO || self.theta > S::ONE {
            return Err(ParamsError::OutOfRange {
                field: "theta",
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

// ============================================================
// 系统参数
// ============================================================

/// 薄膜求解器的全部物理参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemParams<S> {
    /// BGK 松弛时间 τ
    pub tau: S,
    /// 表面张力 γ
    pub gamma: S,
    /// 润湿性参数
    pub wetting: WettingParams<S>,
    /// 干涸阈值：h ≤ floor 的格点速度置零
    pub velocity_floor: S,
}

impl<S: LatticeScalar> Default for SystemParams<S> {
    fn default() -> Self {
        Self {
            tau: S::ONE,
            gamma: S::from_config(0.01),
            wetting: WettingParams::default(),
            velocity_floor: S::VELOCITY_FLOOR,
        }
    }
}

impl<S: LatticeScalar> SystemParams<S> {
    /// 碰撞权重 ω = 1 − 1/τ
    #[inline]
    pub fn omega(&self) -> S {
        S::ONE - S::ONE / self.tau
    }

    /// 运动粘度 ν = c_s²·(τ − 1/2) = (τ − 1/2)/3
    #[inline]
    pub fn viscosity(&self) -> S {
        (self.tau - S::HALF) / S::from_config(3.0)
    }

    /// 验证参数有效性
    ///
    /// 检查正数约束与指数层级，失败时返回第一个违反的约束。
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.tau <= S::ZERO || !self.tau.is_finite() {
            return Err(ParamsError::Constraint {
                field: "tau",
                constraint: "tau > 0",
            });
        }
        if self.gamma < S::ZERO || !self.gamma.is_finite() {
            return Err(ParamsError::Constraint {
                field: "gamma",
                constraint: "gamma >= 0",
            });
        }
        if self.velocity_floor < S::ZERO {
            return Err(ParamsError::Constraint {
                field: "velocity_floor",
                constraint: "velocity_floor >= 0",
            });
        }
        self.wetting.validate()
    }
}

/// f64 精度的系统参数
pub type SystemParamsF64 = SystemParams<f64>;
/// f32 精度的系统参数
pub type SystemParamsF32 = SystemParams<f32>;

// ============================================================
// 错误类型
// ============================================================

/// 参数验证错误
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    /// 约束违反
    #[error("参数{field}违反约束: {constraint}")]
    Constraint {
        field: &'static str,
        constraint: &'static str,
    },
    /// 数值超出允许范围
    #[error("参数{field}超出范围[{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

impl From<ParamsError> for FlbError {
    fn from(err: ParamsError) -> Self {
        FlbError::validation(err.to_string())
    }
}
