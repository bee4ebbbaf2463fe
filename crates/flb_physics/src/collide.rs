// crates/flb_physics/src/collide.rs

//! BGK 碰撞与周期迁移
//!
//! 每个时间步先做单松弛（BGK）碰撞，写入独立的暂存缓冲：
//!
//! ```text
//! f_tmp[k] = (1 − 1/τ)·f_pop[k] + (1/τ)·f_eq[k] + ΔF[k]
//! ```
//!
//! 力修正 ΔF 只施加在部分方向上：
//!
//! | 方向             | 修正        |
//! | ---------------- | ----------- |
//! | (0,0)            | 无          |
//! | (±1, 0)          | ±Fx/6       |
//! | (0, ±1)          | ±Fy/6       |
//! | (−1,+1)          | (Fy−Fx)/24  |
//! | (+1,−1)          | (Fx−Fy)/24  |
//! | (+1,+1), (−1,−1) | 无          |
//!
//! 两个对角修正互为相反数，因此修正不改变任何格点的总质量。
//! 该分布对应薄膜格子 Boltzmann 方法的力离散格式。
//!
//! 迁移采用 gather 读取：`f_pop[k][x,y] ← f_tmp[k][x−e_kx, y−e_ky]`（周期回绕）。
//! 碰撞读 `f_pop` 写 `f_tmp`，迁移读 `f_tmp` 写 `f_pop`，读写始终位于
//! 不同缓冲区，两个阶段都可以按行独立并行。

use rayon::prelude::*;

use flb_foundation::LatticeScalar;

use crate::grid::PeriodicGrid;
use crate::lattice::{EX, EY};
use crate::state::Populations;

/// 单行（或任意对齐切片）上的 BGK 碰撞核
///
/// 串行与并行路径共用本函数，保证两者逐位一致。
#[allow(clippy::too_many_arguments)]
fn collide_rows<S: LatticeScalar>(
    omega: S,
    inv_tau: S,
    src: [&[S]; 9],
    eq: [&[S]; 9],
    fx: &[S],
    fy: &[S],
    dst: [&mut [S]; 9],
) {
    let c6 = S::from_config(1.0 / 6.0);
    let c24 = S::from_config(1.0 / 24.0);

    let [d0, d1, d2, d3, d4, d5, d6, d7, d8] = dst;
    for i in 0..fx.len() {
        let gx = fx[i];
        let gy = fy[i];
        let ax = c6 * gx;
        let ay = c6 * gy;
        // 仅 (−1,+1) 与 (+1,−1) 两个对角方向接收修正，二者之和为零
        let nw = c24 * (gy - gx);
        let se = c24 * (gx - gy);

        d0[i] = omega * src[0][i] + inv_tau * eq[0][i];
        d1[i] = omega * src[1][i] + inv_tau * eq[1][i] + ax;
        d2[i] = omega * src[2][i] + inv_tau * eq[2][i] + ay;
        d3[i] = omega * src[3][i] + inv_tau * eq[3][i] - ax;
        d4[i] = omega * src[4][i] + inv_tau * eq[4][i] - ay;
        d5[i] = omega * src[5][i] + inv_tau * eq[5][i];
        d6[i] = omega * src[6][i] + inv_tau * eq[6][i] + nw;
        d7[i] = omega * src[7][i] + inv_tau * eq[7][i];
        d8[i] = omega * src[8][i] + inv_tau * eq[8][i] + se;
    }
}

/// 将第 `y` 行从 `src` 各平面 gather 到目标行切片
fn stream_row<S: LatticeScalar>(grid: &PeriodicGrid, y: usize, src: &[&[S]; 9], dst: [&mut [S]; 9]) {
    let nx = grid.nx();
    let [d0, d1, d2, d3, d4, d5, d6, d7, d8] = dst;

    // 静止分量不迁移
    let row = y * nx;
    d0.copy_from_slice(&src[0][row..row + nx]);

    let lanes: [&mut [S]; 8] = [d1, d2, d3, d4, d5, d6, d7, d8];
    for (lane, dk) in lanes.into_iter().enumerate() {
        let k = lane + 1;
        let ys = grid.offset_y(y, -EY[k]);
        let base = ys * nx;
        let sk = src[k];
        for (x, out) in dk.iter_mut().enumerate() {
            let xs = grid.offset_x(x, -EX[k]);
            *out = sk[base + xs];
        }
    }
}

/// 碰撞 + 迁移（串行）
///
/// `f_pop` 输入为上一步的分布，返回时已是迁移后的新分布；
/// `f_tmp` 仅作碰撞结果的暂存，内容会被完全覆盖。
pub fn collide_stream_serial<S: LatticeScalar>(
    grid: &PeriodicGrid,
    tau: S,
    f_eq: &Populations<S>,
    f_pop: &mut Populations<S>,
    f_tmp: &mut Populations<S>,
    force_x: &[S],
    force_y: &[S],
) {
    debug_assert_eq!(force_x.len(), grid.len());
    debug_assert_eq!(force_y.len(), grid.len());
    debug_assert_eq!(f_eq.sites(), grid.len());

    let inv_tau = S::ONE / tau;
    let omega = S::ONE - inv_tau;

    collide_rows(
        omega,
        inv_tau,
        f_pop.planes(),
        f_eq.planes(),
        force_x,
        force_y,
        f_tmp.planes_mut(),
    );

    let nx = grid.nx();
    let src = f_tmp.planes();
    let [d0, d1, d2, d3, d4, d5, d6, d7, d8] = f_pop.planes_mut();
    for y in 0..grid.ny() {
        let row = y * nx;
        let end = row + nx;
        stream_row(
            grid,
            y,
            &src,
            [
                &mut d0[row..end],
                &mut d1[row..end],
                &mut d2[row..end],
                &mut d3[row..end],
                &mut d4[row..end],
                &mut d5[row..end],
                &mut d6[row..end],
                &mut d7[row..end],
                &mut d8[row..end],
            ],
        );
    }
}

/// 碰撞 + 迁移（rayon 按行块并行）
///
/// 每行的算术与串行版完全一致，结果逐位相同。
pub fn collide_stream_parallel<S: LatticeScalar>(
    grid: &PeriodicGrid,
    tau: S,
    f_eq: &Populations<S>,
    f_pop: &mut Populations<S>,
    f_tmp: &mut Populations<S>,
    force_x: &[S],
    force_y: &[S],
) {
    debug_assert_eq!(force_x.len(), grid.len());
    debug_assert_eq!(force_y.len(), grid.len());
    debug_assert_eq!(f_eq.sites(), grid.len());

    let inv_tau = S::ONE / tau;
    let omega = S::ONE - inv_tau;
    let nx = grid.nx();

    // ====== 碰撞阶段：读 f_pop / f_eq，写 f_tmp ======
    {
        let src = f_pop.planes();
        let eq = f_eq.planes();
        let [t0, t1, t2, t3, t4, t5, t6, t7, t8] = f_tmp.planes_mut();

        t0.par_chunks_mut(nx)
            .zip(t1.par_chunks_mut(nx))
            .zip(t2.par_chunks_mut(nx))
            .zip(t3.par_chunks_mut(nx))
            .zip(t4.par_chunks_mut(nx))
            .zip(t5.par_chunks_mut(nx))
            .zip(t6.par_chunks_mut(nx))
            .zip(t7.par_chunks_mut(nx))
            .zip(t8.par_chunks_mut(nx))
            .enumerate()
            .for_each(
                |(y, ((((((((r0, r1), r2), r3), r4), r5), r6), r7), r8))| {
                    let row = y * nx;
                    let end = row + r0.len();
                    collide_rows(
                        omega,
                        inv_tau,
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
                        [
                            &eq[0][row..end],
                            &eq[1][row..end],
                            &eq[2][row..end],
                            &eq[3][row..end],
                            &eq[4][row..end],
                            &eq[5][row..end],
                            &eq[6][row..end],
                            &eq[7][row..end],
                            &eq[8][row..end],
                        ],
                        &force_x[row..end],
                        &force_y[row..end],
                        [r0, r1, r2, r3, r4, r5, r6, r7, r8],
                    );
                },
            );
    }

    // ====== 迁移阶段：读 f_tmp，写 f_pop ======
    {
        let src = f_tmp.planes();
        let [d0, d1, d2, d3, d4, d5, d6, d7, d8] = f_pop.planes_mut();

        d0.par_chunks_mut(nx)
            .zip(d1.par_chunks_mut(nx))
            .zip(d2.par_chunks_mut(nx))
            .zip(d3.par_chunks_mut(nx))
            .zip(d4.par_chunks_mut(nx))
            .zip(d5.par_chunks_mut(nx))
            .zip(d6.par_chunks_mut(nx))
            .zip(d7.par_chunks_mut(nx))
            .zip(d8.par_chunks_mut(nx))
            .enumerate()
            .for_each(
                |(y, ((((((((r0, r1), r2), r3), r4), r5), r6), r7), r8))| {
                    stream_row(grid, y, &src, [r0, r1, r2, r3, r4, r5, r6, r7, r8]);
                },
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equilibrium::equilibrium_serial;
    use crate::lattice::Q;

    /// 用确定性模式填充各平面，便于逐位比较
    fn fill_pattern(pop: &mut Populations<f64>, salt: f64) {
        for k in 0..Q {
            let plane = pop.plane_mut(k);
            for (i, v) in plane.iter_mut().enumerate() {
                *v = salt + 0.05 * (k as f64) + 0.001 * (i as f64) + 0.3 * ((i % 7) as f64);
            }
        }
    }

    #[test]
    fn test_tau_one_uniform_state_reproduces_equilibrium() {
        // τ=1 时 ω=0，碰撞结果就是 f_eq；均匀场迁移后不变
        let grid = PeriodicGrid::new(6, 4).unwrap();
        let n = grid.len();
        let h = vec![0.8_f64; n];
        let vx = vec![0.02_f64; n];
        let vy = vec![-0.01_f64; n];

        let mut f_eq = Populations::new(n);
        equilibrium_serial(&grid, &h, &vx, &vy, &mut f_eq);

        let mut f_pop = Populations::new(n);
        fill_pattern(&mut f_pop, 2.0);
        let mut f_tmp = Populations::new(n);
        let zero = vec![0.0_f64; n];

        collide_stream_serial(&grid, 1.0, &f_eq, &mut f_pop, &mut f_tmp, &zero, &zero);

        for k in 0..Q {
            assert_eq!(
                f_pop.plane(k),
                f_eq.plane(k),
                "τ=1 均匀场下第 {} 平面应与平衡分布完全一致",
                k
            );
        }
    }

    #[test]
    fn test_streaming_moves_pulse_along_directions() {
        // τ=1、零力：迁移应把 (0,0) 处的脉冲搬到 (e_kx, e_ky)（含周期回绕）
        let grid = PeriodicGrid::new(4, 3).unwrap();
        let n = grid.len();

        let mut f_eq = Populations::new(n);
        for k in 0..Q {
            f_eq.plane_mut(k)[grid.idx(0, 0)] = 1.0;
        }

        let mut f_pop = Populations::new(n);
        let mut f_tmp = Populations::new(n);
        let zero = vec![0.0_f64; n];

        collide_stream_serial(&grid, 1.0, &f_eq, &mut f_pop, &mut f_tmp, &zero, &zero);

        for k in 0..Q {
            let tx = grid.offset_x(0, EX[k]);
            let ty = grid.offset_y(0, EY[k]);
            let target = grid.idx(tx, ty);
            let plane = f_pop.plane(k);
            for (i, &v) in plane.iter().enumerate() {
                let expected = if i == target { 1.0 } else { 0.0 };
                assert_eq!(
                    v, expected,
                    "方向 {} 的脉冲应出现在 ({}, {})，索引 {} 处值错误",
                    k, tx, ty, i
                );
            }
        }
    }

    #[test]
    fn test_forcing_direction_pattern() {
        // 均匀静止膜 + τ=1：各方向增量应精确等于力修正表
        let grid = PeriodicGrid::new(5, 5).unwrap();
        let n = grid.len();
        let h = vec![1.0_f64; n];
        let v0 = vec![0.0_f64; n];

        let mut f_eq = Populations::new(n);
        equilibrium_serial(&grid, &h, &v0, &v0, &mut f_eq);

        let mut f_pop = Populations::new(n);
        f_pop.copy_from(&f_eq);
        let mut f_tmp = Populations::new(n);

        let fx_val = 0.3_f64;
        let fy_val = -0.12_f64;
        let fx = vec![fx_val; n];
        let fy = vec![fy_val; n];

        collide_stream_serial(&grid, 1.0, &f_eq, &mut f_pop, &mut f_tmp, &fx, &fy);

        let c6 = 1.0 / 6.0;
        let c24 = 1.0 / 24.0;
        let expected = [
            0.0,
            c6 * fx_val,
            c6 * fy_val,
            -(c6 * fx_val),
            -(c6 * fy_val),
            0.0,
            c24 * (fy_val - fx_val),
            0.0,
            c24 * (fx_val - fy_val),
        ];

        for k in 0..Q {
            let delta = f_pop.plane(k)[grid.idx(2, 2)] - f_eq.plane(k)[grid.idx(2, 2)];
            assert_eq!(
                delta, expected[k],
                "方向 {} 的力修正错误：got {}, want {}",
                k, delta, expected[k]
            );
        }

        // 修正之和为零，总质量不变
        let mass: f64 = (0..Q).map(|k| f_pop.plane(k)[grid.idx(2, 2)]).sum();
        assert!(
            (mass - 1.0).abs() < 1e-12,
            "力修正改变了格点质量: {}",
            mass
        );
    }

    #[test]
    fn test_parallel_matches_serial_bitwise() {
        let grid = PeriodicGrid::new(17, 9).unwrap();
        let n = grid.len();

        let mut f_eq = Populations::new(n);
        fill_pattern(&mut f_eq, 0.5);

        let mut pop_serial = Populations::new(n);
        fill_pattern(&mut pop_serial, 1.25);
        let mut pop_parallel = Populations::new(n);
        pop_parallel.copy_from(&pop_serial);

        let mut tmp_serial = Populations::new(n);
        let mut tmp_parallel = Populations::new(n);

        let fx: Vec<f64> = (0..n).map(|i| 0.01 * ((i % 11) as f64) - 0.03).collect();
        let fy: Vec<f64> = (0..n).map(|i| -0.02 * ((i % 5) as f64) + 0.01).collect();

        collide_stream_serial(&grid, 0.8, &f_eq, &mut pop_serial, &mut tmp_serial, &fx, &fy);
        collide_stream_parallel(
            &grid,
            0.8,
            &f_eq,
            &mut pop_parallel,
            &mut tmp_parallel,
            &fx,
            &fy,
        );

        for k in 0..Q {
            assert_eq!(
                pop_serial.plane(k),
                pop_parallel.plane(k),
                "并行与串行在第 {} 平面上不一致",
                k
            );
        }
    }

    #[test]
    fn test_streaming_conserves_plane_sums() {
        // 迁移是纯置换：τ=1 且零力时，每个平面的总和与 f_eq 一致
        let grid = PeriodicGrid::new(8, 6).unwrap();
        let n = grid.len();

        let mut f_eq = Populations::new(n);
        fill_pattern(&mut f_eq, 0.1);

        let mut f_pop = Populations::new(n);
        let mut f_tmp = Populations::new(n);
        let zero = vec![0.0_f64; n];

        collide_stream_serial(&grid, 1.0, &f_eq, &mut f_pop, &mut f_tmp, &zero, &zero);

        for k in 0..Q {
            let before: f64 = f_eq.plane(k).iter().sum();
            let after: f64 = f_pop.plane(k).iter().sum();
            assert!(
                (before - after).abs() < 1e-9 * before.abs().max(1.0),
                "第 {} 平面总和在迁移中发生漂移: {} -> {}",
                k,
                before,
                after
            );
        }
    }
}
