// crates/flb_physics/src/forcing/mod.rs

//! 外力项
//!
//! 每个时间步的合力由压力梯度项打底（求解器直接写入），随后各
//! 外力项通过 [`ForceTerm::accumulate`] 把自己的贡献累加到力场上。
//! 累加顺序即注册顺序，串行执行，带随机数的力项因此是可复现的。
//!
//! 内置力项：
//! - [`SlippageForce`]: 基底滑移摩擦
//! - [`ThermalFluctuation`]: 涨落流体力学的热噪声
//! - [`InclinationForce`]: 基底倾斜产生的体积力

pub mod inclination;
pub mod slippage;
pub mod thermal;

pub use inclination::InclinationForce;
pub use slippage::SlippageForce;
pub use thermal::ThermalFluctuation;

use flb_foundation::LatticeScalar;

use crate::grid::PeriodicGrid;

/// 每步传给力项的上下文
#[derive(Debug, Clone, Copy)]
pub struct ForceContext {
    /// 当前时间步序号
    pub step: u64,
}

/// 外力项接口
///
/// `accumulate` 把贡献累加（而非覆盖）到力场上，因此多个力项
/// 可以自由组合。需要内部状态（如随机数发生器）的力项通过
/// `&mut self` 推进状态。
pub trait ForceTerm<S: LatticeScalar>: Send {
    /// 力项名称
    fn name(&self) -> &'static str;

    /// 是否参与本次模拟（恒为零的力项返回 false 可跳过整场循环）
    fn is_enabled(&self) -> bool {
        true
    }

    /// 把本力项的贡献累加到 `(fx, fy)`
    #[allow(clippy::too_many_arguments)]
    fn accumulate(
        &mut self,
        ctx: &ForceContext,
        grid: &PeriodicGrid,
        h: &[S],
        vx: &[S],
        vy: &[S],
        fx: &mut [S],
        fy: &mut [S],
    );
}
