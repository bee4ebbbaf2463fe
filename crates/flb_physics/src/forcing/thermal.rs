// crates/flb_physics/src/forcing/thermal.rs

//! 热涨落
//!
//! 涨落流体力学给出的随机力，强度与滑移摩擦系数满足涨落耗散关系：
//!
//! ```text
//! α(h) = 6μ·h / (2h² + 6δh + 3δ²)
//! F    = sqrt(2·kbT·α(h)) · ξ,   ξ ~ N(0, 1)
//! ```
//!
//! 随机数来自显式播种的 ChaCha8 计数器流，按格点顺序先 x 后 y 采样，
//! 同一种子在任何平台上给出完全相同的力序列。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use flb_foundation::{FlbError, FlbResult, LatticeScalar};

use crate::forcing::{ForceContext, ForceTerm};
use crate::grid::PeriodicGrid;

/// 热涨落力
pub struct ThermalFluctuation<S> {
    kbt: S,
    viscosity: S,
    delta: S,
    rng: ChaCha8Rng,
}

impl<S: LatticeScalar> ThermalFluctuation<S> {
    /// 创建热涨落力项
    ///
    /// `kbt` 为热能（允许为零，此时力项被禁用），`viscosity` 与
    /// `delta` 必须为正，`seed` 决定整条随机数序列。
    pub fn new(kbt: S, viscosity: S, delta: S, seed: u64) -> FlbResult<Self> {
        if kbt < S::ZERO {
            return Err(FlbError::invalid_input("kbt 不能为负"));
        }
        FlbError::check_positive("viscosity", viscosity.to_f64_lossy())?;
        FlbError::check_positive("delta", delta.to_f64_lossy())?;
        Ok(Self {
            kbt,
            viscosity,
            delta,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// 热能 kbT
    #[inline]
    pub fn kbt(&self) -> S {
        self.kbt
    }
}

impl<S: LatticeScalar> std::fmt::Debug for ThermalFluctuation<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalFluctuation")
            .field("kbt", &self.kbt)
            .field("viscosity", &self.viscosity)
            .field("delta", &self.delta)
            .finish()
    }
}

impl<S: LatticeScalar> ForceTerm<S> for ThermalFluctuation<S> {
    fn name(&self) -> &'static str {
        "thermal"
    }

    fn is_enabled(&self) -> bool {
        self.kbt > S::ZERO
    }

    fn accumulate(
        &mut self,
        _ctx: &ForceContext,
        _grid: &PeriodicGrid,
        h: &[S],
        _vx: &[S],
        _vy: &[S],
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
        let kbt2 = two * self.kbt;

        for i in 0..h.len() {
            // 数值噪声可能让膜厚轻微越过零，摩擦系数按零处理
            let hi = if h[i] > S::ZERO { h[i] } else { S::ZERO };
            let denom = two * hi * hi + d6 * hi + dd3;
            let alpha = mu6 * hi / denom;
            let amp = (kbt2 * alpha).sqrt();

            let xi_x: f64 = self.rng.sample(StandardNormal);
            let xi_y: f64 = self.rng.sample(StandardNormal);
            fx[i] += amp * S::from_config(xi_x);
            fy[i] += amp * S::from_config(xi_y);
        }
    }
}
