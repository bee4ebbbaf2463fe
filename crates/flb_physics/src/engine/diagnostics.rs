// crates/flb_physics/src/engine/diagnostics.rs

//! 质量守恒跟踪
//!
//! 格子 Boltzmann 的碰撞与迁移都不改变总质量，长时间运行中可观测
//! 的质量漂移只能来自浮点舍入，正常量级在 1e-12 以下。漂移超出
//! 容差几乎总是数值发散的前兆，按错误中止比继续跑完更有用。

use flb_foundation::{FlbError, FlbResult};

/// 相对质量漂移跟踪器
///
/// 以初始质量为基准，监控每次检查点的相对偏差。超过容差一半时
/// 记录警告，超过容差时返回 [`FlbError::Divergence`]。
#[derive(Debug, Clone)]
pub struct MassTracker {
    initial: f64,
    tolerance: f64,
    worst: f64,
}

impl MassTracker {
    /// 以初始质量与相对容差创建跟踪器
    pub fn new(initial: f64, tolerance: f64) -> Self {
        Self {
            initial,
            tolerance,
            worst: 0.0,
        }
    }

    /// 基准质量
    #[inline]
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// 运行至今观测到的最大漂移
    #[inline]
    pub fn worst_drift(&self) -> f64 {
        self.worst
    }

    /// 当前质量相对基准的漂移
    pub fn relative_drift(&self, current: f64) -> f64 {
        if self.initial == 0.0 {
            current.abs()
        } else {
            ((current - self.initial) / self.initial).abs()
        }
    }

    /// 检查一次质量读数
    pub fn check(&mut self, step: u64, current: f64) -> FlbResult<()> {
        let drift = self.relative_drift(current);
        if drift > self.worst {
            self.worst = drift;
        }

        if drift > self.tolerance {
            log::error!(
                "质量守恒失败！第 {} 步相对漂移 {:.3e} 超过容差 {:.1e}",
                step,
                drift,
                self.tolerance
            );
            return Err(FlbError::divergence(format!(
                "第 {} 步质量漂移 {:.3e} 超过容差 {:.1e}",
                step, drift, self.tolerance
            )));
        }
        if drift > 0.5 * self.tolerance {
            log::warn!("第 {} 步质量漂移 {:.3e} 接近容差 {:.1e}", step, drift, self.tolerance);
        }
        Ok(())
    }
}
