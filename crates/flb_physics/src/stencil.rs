// crates/flb_physics/src/stencil.rs

//! 九点差分算子
//!
//! 周期格子上的一阶梯度与各向同性 Laplace 算子：
//!
//! ```text
//! gx = (1/3)(E - W) + (1/12)(NE - NW - SW + SE)
//! gy = (1/3)(N - S) + (1/12)(NE + NW - SW - SE)
//! ∇² = (2/3)(E + N + W + S) + (1/6)(NE + NW + SW + SE) - (10/3)·C
//! ```
//!
//! 对角项的权重选取使 Laplace 算子的各向异性误差最小。两个算子都是
//! 纯函数，同一输入在串行与并行路径下逐位一致（每个格点的求值顺序固定）。
//!
//! `scale` 参数把前导系数（如 -γ）折叠进单次遍历。

use rayon::prelude::*;

use flb_foundation::LatticeScalar;

use crate::grid::PeriodicGrid;

#[inline]
fn gradient_row<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f: &[S],
    gx_row: &mut [S],
    gy_row: &mut [S],
    y: usize,
    scale: S,
) {
    let nx = grid.nx();
    let c3 = S::from_config(1.0 / 3.0);
    let c12 = S::from_config(1.0 / 12.0);

    let row = y * nx;
    let row_n = grid.offset_y(y, 1) * nx;
    let row_s = grid.offset_y(y, -1) * nx;

    for x in 0..nx {
        let xe = grid.offset_x(x, 1);
        let xw = grid.offset_x(x, -1);

        let e = f[row + xe];
        let w = f[row + xw];
        let n = f[row_n + x];
        let s = f[row_s + x];
        let ne = f[row_n + xe];
        let nw = f[row_n + xw];
        let se = f[row_s + xe];
        let sw = f[row_s + xw];

        gx_row[x] = (c3 * (e - w) + c12 * (ne - nw - sw + se)) * scale;
        gy_row[x] = (c3 * (n - s) + c12 * (ne + nw - sw - se)) * scale;
    }
}

#[inline]
fn laplacian_row<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f: &[S],
    out_row: &mut [S],
    y: usize,
    scale: S,
) {
    let nx = grid.nx();
    let c23 = S::from_config(2.0 / 3.0);
    let c6 = S::from_config(1.0 / 6.0);
    let c103 = S::from_config(10.0 / 3.0);

    let row = y * nx;
    let row_n = grid.offset_y(y, 1) * nx;
    let row_s = grid.offset_y(y, -1) * nx;

    for x in 0..nx {
        let xe = grid.offset_x(x, 1);
        let xw = grid.offset_x(x, -1);

        let c = f[row + x];
        let axis = f[row + xe] + f[row_n + x] + f[row + xw] + f[row_s + x];
        let diag = f[row_n + xe] + f[row_n + xw] + f[row_s + xw] + f[row_s + xe];

        out_row[x] = (c23 * axis + c6 * diag - c103 * c) * scale;
    }
}

/// 九点梯度（串行）
///
/// `gx`、`gy` 与 `f` 必须等长且与网格一致；`scale` 同时乘到两个输出分量。
pub fn gradient_serial<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f: &[S],
    gx: &mut [S],
    gy: &mut [S],
    scale: S,
) {
    debug_assert_eq!(f.len(), grid.len());
    debug_assert_eq!(gx.len(), grid.len());
    debug_assert_eq!(gy.len(), grid.len());

    let nx = grid.nx();
    for y in 0..grid.ny() {
        let row = y * nx;
        gradient_row(grid, f, &mut gx[row..row + nx], &mut gy[row..row + nx], y, scale);
    }
}

/// 九点梯度（rayon 按行并行）
pub fn gradient_parallel<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f: &[S],
    gx: &mut [S],
    gy: &mut [S],
    scale: S,
) {
    debug_assert_eq!(f.len(), grid.len());
    debug_assert_eq!(gx.len(), grid.len());
    debug_assert_eq!(gy.len(), grid.len());

    let nx = grid.nx();
    gx.par_chunks_mut(nx)
        .zip(gy.par_chunks_mut(nx))
        .enumerate()
        .for_each(|(y, (gx_row, gy_row))| {
            gradient_row(grid, f, gx_row, gy_row, y, scale);
        });
}

/// 九点 Laplace 算子（串行）
pub fn laplacian_serial<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f: &[S],
    out: &mut [S],
    scale: S,
) {
    debug_assert_eq!(f.len(), grid.len());
    debug_assert_eq!(out.len(), grid.len());

    let nx = grid.nx();
    for y in 0..grid.ny() {
        let row = y * nx;
        laplacian_row(grid, f, &mut out[row..row + nx], y, scale);
    }
}

/// 九点 Laplace 算子（rayon 按行并行）
pub fn laplacian_parallel<S: LatticeScalar>(
    grid: &PeriodicGrid,
    f: &[S],
    out: &mut [S],
    scale: S,
) {
    debug_assert_eq!(f.len(), grid.len());
    debug_assert_eq!(out.len(), grid.len());

    let nx = grid.nx();
    out.par_chunks_mut(nx).enumerate().for_each(|(y, out_row)| {
        laplacian_row(grid, f, out_row, y, scale);
    });
}
