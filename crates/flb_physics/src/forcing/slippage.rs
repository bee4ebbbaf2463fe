// crates/flb_physics/src/forcing/slippage.rs

//! 基底滑移摩擦
//!
//! 薄膜润滑理论中带滑移长度 δ 的基底摩擦：
//!
//! ```text
//! F = −6μ·h·v / (2h² + 6δh + 3δ²)
//! ```
//!
//! δ > 0 时分母有正下界 3δ²，干涸格点 (h→0) 的摩擦力平滑地趋于零，
//! 不需要额外的除零保护。

use flb_foundation::{FlbError, FlbResult, LatticeScalar};

use crate::forcing::{ForceContext, ForceTerm};
use crate::grid::PeriodicGrid;

/// 滑移摩擦力
#[derive(Debug, Clone)]
pub struct SlippageForce<S> {
    delta: S,
    viscosity: S,
}

impl<S: LatticeScalar> SlippageForce<S> {
    /// 创建滑移摩擦力项
    ///
    /// `delta` 为滑移长度，`viscosity` 为动力粘度，二者必须为正。
    pub fn new(delta: S, viscosity: S) -> FlbResult<Self> {
        FlbError::check_positive("delta", delta.to_f64_lossy())?;
        FlbError::check_positive("viscosity", viscosity.to_f64_lossy())?;
        Ok(Self { delta, viscosity })
    }

    /// 使用默认粘度 μ = 1/6
    pub fn with_default_viscosity(delta: S) -> FlbResult<Self> {
        Self::new(delta, S::from_config(1.0 / 6.0))
    }

    /// 滑移长度
    #[inline]
    pub fn delta(&self) -> S {
        self.delta
    }
}

impl<S: LatticeScalar> ForceTerm<S> for SlippageForce<S> {
    fn name(&self) -> &'static str {
        "slippage"
    }

    fn accumulate(
        &mut self,
        _ctx: &ForceContext,
        _grid: &PeriodicGrid,
        h: &[S],
        vx: &[S],
        vy: &[S],
        fx: &mut [S],
        fy: &mut [S],
    ) {
        let two = S::TWO;
        let three = S::from_config(3.0);
        let six = S::from_config(6.0);
        let d = self.delta;
        let dd3 = three * d * d;
        let d6 = six * d;
        let mu6 = six * self.viscosity;

        for i in 0..h.len() {
            let hi = h[i];
            let denom = two * hi * hi + d6 * hi + dd3;
            let coeff = -(mu6 * hi) / denom;
            fx[i] += coeff * vx[i];
            fy[i] += coeff * vy[i];
        }
    }
}
