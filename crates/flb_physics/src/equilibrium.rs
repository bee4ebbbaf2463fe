// crates/flb_physics/src/equilibrium.rs

//! D2Q9 浅水平衡分布
//!
//! 二阶截断 Maxwell 展开的浅水变体（无重力项版本，基底倾斜通过
//! 强迫项进入）。每个格点的九个平衡权重只依赖局部 (h, vx, vy)：
//!
//! ```text
//! f0 = h·(1 - 2/3·|v|²)
//! 轴向:  f_k = h·( 1/3·(e·v) + 1/2·(e·v)² - 1/6·|v|² )
//! 对角:  f_k = h·( 1/12·(e·v) + 1/8·(e·v)² - 1/24·|v|² )
//! ```
//!
//! 两条恒等式逐点成立（至浮点舍入）：Σf_eq = h，Σf_eq·e = (h·vx, h·vy)。

use rayon::prelude::*;

use flb_foundation::LatticeScalar;

use crate::grid::PeriodicGrid;
use crate::state::Populations;

struct EqCoeffs<S> {
    c23: S,
    c3: S,
    c2: S,
    c6: S,
    c12: S,
    c8: S,
    c24: S,
}

impl<S: LatticeScalar> EqCoeffs<S> {
    fn new() -> Self {
        Self {
            c23: S::from_config(2.0 / 3.0),
            c3: S::from_config(1.0 / 3.0),
            c2: S::HALF,
            c6: S::from_config(1.0 / 6.0),
            c12: S::from_config(1.0 / 12.0),
            c8: S::from_config(1.0 / 8.0),
            c24: S::from_config(1.0 / 24.0),
        }
    }
}

/// 单点平衡分布
///
/// 返回九个方向的平衡权重，顺序与 [`crate::lattice`] 的编号一致。
#[inline]
pub fn equilibrium_site<S: LatticeScalar>(h: S, vx: S, vy: S) -> [S; 9] {
    let c = EqCoeffs::<S>::new();
    equilibrium_site_with(&c, h, vx, vy)
}

#[inline]
fn equilibrium_site_with<S: LatticeScalar>(c: &EqCoeffs<S>, h: S, vx: S, vy: S) -> [S; 9] {
    let vsq = vx * vx + vy * vy;
    let upv = vx + vy;
    let vmu = vy - vx;

    [
        h * (S::ONE - c.c23 * vsq),
        h * (c.c3 * vx + c.c2 * vx * vx - c.c6 * vsq),
        h * (c.c3 * vy + c.c2 * vy * vy - c.c6 * vsq),
        h * (-(c.c3 * vx) + c.c2 * vx * vx - c.c6 * vsq),
        h * (-(c.c3 * vy) + c.c2 * vy * vy - c.c6 * vsq),
        h * (c.c12 * upv + c.c8 * upv * upv - c.c24 * vsq),
        h * (c.c12 * vmu + c.c8 * vmu * vmu - c.c24 * vsq),
        h * (-(c.c12 * upv) + c.c8 * upv * upv - c.c24 * vsq),
        h * (-(c.c12 * vmu) + c.c8 * vmu * vmu - c.c24 * vsq),
    ]
}

fn equilibrium_rows<S: LatticeScalar>(h: &[S], vx: &[S], vy: &[S], planes: [&mut [S]; 9]) {
    let c = EqCoeffs::<S>::new();
    let [p0, p1, p2, p3, p4, p5, p6, p7, p8] = planes;
    for (i, ((&hi, &ui), &vi)) in h.iter().zip(vx).zip(vy).enumerate() {
        let feq = equilibrium_site_with(&c, hi, ui, vi);
        p0[i] = feq[0];
        p1[i] = feq[1];
        p2[i] = feq[2];
        p3[i] = feq[3];
        p4[i] = feq[4];
        p5[i] = feq[5];
        p6[i] = feq[6];
        p7[i] = feq[7];
        p8[i] = feq[8];
    }
}

/// 平衡分布（串行）
pub fn equilibrium_serial<S: LatticeScalar>(
    grid: &PeriodicGrid,
    h: &[S],
    vx: &[S],
    vy: &[S],
    feq: &mut Populations<S>,
) {
    debug_assert_eq!(h.len(), grid.len());
    debug_assert_eq!(feq.sites(), grid.len());

    equilibrium_rows(h, vx, vy, feq.planes_mut());
}

/// 平衡分布（rayon 按行块并行）
pub fn equilibrium_parallel<S: LatticeScalar>(
    grid: &PeriodicGrid,
    h: &[S],
    vx: &[S],
    vy: &[S],
    feq: &mut Populations<S>,
) {
    debug_assert_eq!(h.len(), grid.len());
    debug_assert_eq!(feq.sites(), grid.len());

    let nx = grid.nx();
    let [p0, p1, p2, p3, p4, p5, p6, p7, p8] = feq.planes_mut();

    p0.par_chunks_mut(nx)
        .zip(p1.par_chunks_mut(nx))
        .zip(p2.par_chunks_mut(nx))
        .zip(p3.par_chunks_mut(nx))
        .zip(p4.par_chunks_mut(nx))
        .zip(p5.par_chunks_mut(nx))
        .zip(p6.par_chunks_mut(nx))
        .zip(p7.par_chunks_mut(nx))
        .zip(p8.par_chunks_mut(nx))
        .enumerate()
        .for_each(
            |(y, ((((((((r0, r1), r2), r3), r4), r5), r6), r7), r8))| {
                let row = y * nx;
                let end = row + r0.len();
                equilibrium_rows(
                    &h[row..end],
                    &vx[row..end],
                    &vy[row..end],
                    [r0, r1, r2, r3, r4, r5, r6, r7, r8],
                );
            },
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{EX, EY, Q};

    #[test]
    fn test_rest_state_all_in_center() {
        let feq = equilibrium_site(1.5f64, 0.0, 0.0);
        assert_eq!(feq[0], 1.5);
        for k in 1..Q {
            assert_eq!(feq[k], 0.0, "静止态方向 {k} 应为零");
        }
    }

    #[test]
    fn test_mass_identity() {
        let cases = [
            (1.0f64, 0.05, -0.02),
            (0.3, 0.1, 0.1),
            (2.0, -0.08, 0.03),
            (0.0, 0.1, -0.1),
        ];
        for &(h, vx, vy) in &cases {
            let feq = equilibrium_site(h, vx, vy);
            let sum: f64 = feq.iter().sum();
            assert!(
                (sum - h).abs() < 1e-14 * h.abs().max(1.0),
                "质量恒等式失败: h={h}, Σf={sum}"
            );
        }
    }

    #[test]
    fn test_momentum_identity() {
        let cases = [(1.0f64, 0.05, -0.02), (0.7, 0.12, 0.04), (1.8, -0.06, 0.09)];
        for &(h, vx, vy) in &cases {
            let feq = equilibrium_site(h, vx, vy);
            let mut mx = 0.0;
            let mut my = 0.0;
            for k in 0..Q {
                mx += feq[k] * EX[k] as f64;
                my += feq[k] * EY[k] as f64;
            }
            assert!((mx - h * vx).abs() < 1e-14, "x 动量: {mx} vs {}", h * vx);
            assert!((my - h * vy).abs() < 1e-14, "y 动量: {my} vs {}", h * vy);
        }
    }

    #[test]
    fn test_field_version_matches_site_version() {
        let grid = PeriodicGrid::new(4, 3).unwrap();
        let n = grid.len();
        let h: Vec<f64> = (0..n).map(|i| 0.5 + 0.01 * i as f64).collect();
        let vx: Vec<f64> = (0..n).map(|i| 0.002 * i as f64).collect();
        let vy: Vec<f64> = (0..n).map(|i| -0.001 * i as f64).collect();

        let mut feq = Populations::new(n);
        equilibrium_serial(&grid, &h, &vx, &vy, &mut feq);

        for i in 0..n {
            let local = equilibrium_site(h[i], vx[i], vy[i]);
            for (k, &lv) in local.iter().enumerate() {
                assert_eq!(feq.plane(k)[i], lv, "site {i} dir {k}");
            }
        }
    }

    #[test]
    fn test_parallel_matches_serial_bitwise() {
        let grid = PeriodicGrid::new(16, 8).unwrap();
        let n = grid.len();
        let h: Vec<f64> = (0..n).map(|i| 0.1 + ((i * 7919) % 101) as f64 * 0.01).collect();
        let vx: Vec<f64> = (0..n).map(|i| ((i * 104729) % 41) as f64 * 1e-3 - 0.02).collect();
        let vy: Vec<f64> = (0..n).map(|i| ((i * 15485863) % 37) as f64 * 1e-3 - 0.018).collect();

        let mut a = Populations::new(n);
        let mut b = Populations::new(n);
        equilibrium_serial(&grid, &h, &vx, &vy, &mut a);
        equilibrium_parallel(&grid, &h, &vx, &vy, &mut b);
        for k in 0..Q {
            assert_eq!(a.plane(k), b.plane(k), "方向 {k} 串行/并行不一致");
        }
    }
}
