// crates/flb_physics/src/moments.rs

//! 宏观量提取（零阶与一阶矩）
//!
//! 从分布函数恢复膜厚与速度：
//!
//! ```text
//! h  = Σ_k f_k                       （固定按 k=0..8 顺序累加）
//! mx = f1 − f3 + f5 − f6 − f7 + f8
//! my = f2 − f4 + f5 + f6 − f7 − f8
//! v  = (mx/h, my/h)
//! ```
//!
//! 当 `h ≤ floor` 时速度直接置零，薄膜干涸区域不会产生 NaN/Inf。
//! 求和顺序固定，串行与并行路径共用同一核函数，结果逐位一致。

use rayon::prelude::*;

use flb_foundation::LatticeScalar;

use crate::grid::PeriodicGrid;
use crate::state::Populations;

/// 单行（或任意对齐切片）上的矩计算核
fn moment_rows<S: LatticeScalar>(
    src: [&[S]; 9],
    floor: S,
    h: &mut [S],
    vx: &mut [S],
    vy: &mut [S],
) {
    for i in 0..h.len() {
        let f0 = src[0][i];
        let f1 = src[1][i];
        let f2 = src[2][i];
        let f3 = src[3][i];
        let f4 = src[4][i];
        let f5 = src[5][i];
        let f6 = src[6][i];
        let f7 = src[7][i];
        let f8 = src[8][i];

        let hi = f0 + f1 + f2 + f3 + f4 + f5 + f6 + f7 + f8;
        h[i] = hi;

        if hi > floor {
            let mx = f1 - f3 + f5 - f6 - f7 + f8;
            let my = f2 - f4 + f5 + f6 - f7 - f8;
            vx[i] = mx / hi;
            vy[i] = my / hi;
        } else {
            vx[i] = S::ZERO;
            vy[i] = S::ZERO;
        }
    }
}

/// 宏观量提取（串行）
pub fn moments_serial<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f_pop: &Populations<S>,
    h: &mut [S],
    vx: &mut [S],
    vy: &mut [S],
    floor: S,
) {
    debug_assert_eq!(h.len(), grid.len());
    debug_assert_eq!(f_pop.sites(), grid.len());

    moment_rows(f_pop.planes(), floor, h, vx, vy);
}

/// 宏观量提取（rayon 按行块并行）
pub fn moments_parallel<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f_pop: &Populations<S>,
    h: &mut [S],
    vx: &mut [S],
    vy: &mut [S],
    floor: S,
) {
    debug_assert_eq!(h.len(), grid.len());
    debug_assert_eq!(f_pop.sites(), grid.len());

    let nx = grid.nx();
    let src = f_pop.planes();

    h.par_chunks_mut(nx)
        .zip(vx.par_chunks_mut(nx))
        .zip(vy.par_chunks_mut(nx))
        .enumerate()
        .for_each(|(y, ((hr, vxr), vyr))| {
            let row = y * nx;
            let end = row + hr.len();
            moment_rows(
                [
                    &src[0][row..end],
                    &src[1][row..end],
                    &src[2][row..end],
                    &src[3][row..end],
                    &src[4][row..end],
                    &src[5][row..end],
                    &src[6][row..end],
                    &src[7][row..end],
                    &src[8][row..end],
                ],
                floor,
                hr,
                vxr,
                vyr,
            );
        });
}
