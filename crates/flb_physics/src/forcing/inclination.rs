// crates/flb_physics/src/forcing/inclination.rs

//! 基底倾斜
//!
//! 倾斜基底上沿面内方向的重力分量，体积力与局部膜厚成正比：
//!
//! ```text
//! F = h · (g_x, g_y)
//! ```

use flb_foundation::LatticeScalar;

use crate::forcing::{ForceContext, ForceTerm};
use crate::grid::PeriodicGrid;

/// 倾斜驱动力
#[derive(Debug, Clone, Copy)]
pub struct InclinationForce<S> {
    gx: S,
    gy: S,
}

impl<S: LatticeScalar> InclinationForce<S> {
    /// 创建倾斜力项，`(gx, gy)` 为沿面内的重力分量
    pub fn new(gx: S, gy: S) -> Self {
        Self { gx, gy }
    }
}

impl<S: LatticeScalar> ForceTerm<S> for InclinationForce<S> {
    fn name(&self) -> &'static str {
        "inclination"
    }

    fn is_enabled(&self) -> bool {
        self.gx != S::ZERO || self.gy != S::ZERO
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
        let gx = self.gx;
        let gy = self.gy;
        for i in 0..h.len() {
            fx[i] += h[i] * gx;
            fy[i] += h[i] * gy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_when_level() {
        let level = InclinationForce::<f64>::new(0.0, 0.0);
        assert!(!level.is_enabled());
        let tilted = InclinationForce::<f64>::new(1e-4, 0.0);
        assert!(tilted.is_enabled());
    }

    #[test]
    fn test_force_proportional_to_height() {
        let grid = PeriodicGrid::new(3, 1).unwrap();
        let mut force = InclinationForce::new(2e-4, -1e-4);
        let ctx = ForceContext { step: 0 };

        let h = vec![0.0, 0.5, 1.0];
        let vx = vec![0.0; 3];
        let vy = vec![0.0; 3];
        let mut fx = vec![0.0; 3];
        let mut fy = vec![0.0; 3];
        force.accumulate(&ctx, &grid, &h, &vx, &vy, &mut fx, &mut fy);

        assert_eq!(fx[0], 0.0);
        assert_eq!(fx[1], 0.5 * 2e-4);
        assert_eq!(fx[2], 1.0 * 2e-4);
        assert_eq!(fy[2], -1e-4);
    }
}
