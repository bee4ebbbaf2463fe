// crates/flb_physics/tests/numerics_tests.rs
//!
//! 差分算子数学正确性测试
//!
//! 用独立转写的参考实现与离散谱恒等式验证九点模板，
//! 并检查串行/并行后端的逐位一致性

use flb_foundation::KahanSum;
use flb_physics::backend::{Backend, ParallelBackend, SerialBackend};
use flb_physics::grid::PeriodicGrid;
use flb_physics::state::Populations;
use flb_physics::stencil::{gradient_serial, laplacian_serial};
use std::f64::consts::PI;

// ============================================================
// 测试辅助函数
// ============================================================

/// 确定性伪随机场（线性同余），值域约 [0, 1)
fn seeded_field(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 100000) as f64 / 100000.0
        })
        .collect()
}

/// 梯度参考实现
///
/// 与库内实现同一公式，但换用 `idx_shifted` 寻址和除法写系数，
/// 求值顺序刻意不同。
fn reference_gradient(grid: &PeriodicGrid, f: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut gx = vec![0.0; grid.len()];
    let mut gy = vec![0.0; grid.len()];
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let v = |sx: i64, sy: i64| f[grid.idx_shifted(x, y, sx, sy)];
            gx[grid.idx(x, y)] = (v(1, 0) - v(-1, 0)) / 3.0
                + (v(1, 1) - v(-1, 1) - v(-1, -1) + v(1, -1)) / 12.0;
            gy[grid.idx(x, y)] = (v(0, 1) - v(0, -1)) / 3.0
                + (v(1, 1) + v(-1, 1) - v(-1, -1) - v(1, -1)) / 12.0;
        }
    }
    (gx, gy)
}

/// Laplace 算子参考实现
fn reference_laplacian(grid: &PeriodicGrid, f: &[f64]) -> Vec<f64> {
    let mut lap = vec![0.0; grid.len()];
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let v = |sx: i64, sy: i64| f[grid.idx_shifted(x, y, sx, sy)];
            let axis = v(1, 0) + v(0, 1) + v(-1, 0) + v(0, -1);
            let diag = v(1, 1) + v(-1, 1) + v(-1, -1) + v(1, -1);
            lap[grid.idx(x, y)] = (2.0 * axis) / 3.0 + diag / 6.0 - (10.0 * v(0, 0)) / 3.0;
        }
    }
    lap
}

// ============================================================
// Test 1: Reference Stencil Agreement
// ============================================================

#[test]
fn test_gradient_matches_reference_stencil() {
    // 验收标准：与独立转写实现逐点误差 < 1e-13
    // 测试目的：排除寻址错误与系数抄写错误

    let grid = PeriodicGrid::new(13, 7).unwrap();
    let f = seeded_field(grid.len(), 42);

    let mut gx = vec![0.0; grid.len()];
    let mut gy = vec![0.0; grid.len()];
    gradient_serial(&grid, &f, &mut gx, &mut gy, 1.0);

    let (rx, ry) = reference_gradient(&grid, &f);
    for i in 0..grid.len() {
        assert!(
            (gx[i] - rx[i]).abs() < 1e-13,
            "gx[{}] = {} vs 参考 {}",
            i,
            gx[i],
            rx[i]
        );
        assert!(
            (gy[i] - ry[i]).abs() < 1e-13,
            "gy[{}] = {} vs 参考 {}",
            i,
            gy[i],
            ry[i]
        );
    }
}

#[test]
fn test_laplacian_matches_reference_stencil() {
    let grid = PeriodicGrid::new(11, 9).unwrap();
    let f = seeded_field(grid.len(), 7);

    let mut lap = vec![0.0; grid.len()];
    laplacian_serial(&grid, &f, &mut lap, 1.0);

    let reference = reference_laplacian(&grid, &f);
    for i in 0..grid.len() {
        assert!(
            (lap[i] - reference[i]).abs() < 1e-12,
            "lap[{}] = {} vs 参考 {}",
            i,
            lap[i],
            reference[i]
        );
    }
}

// ============================================================
// Test 2: Discrete Spectral Identities
// ============================================================

#[test]
fn test_gradient_sine_wave_discrete_symbol() {
    // 验收标准：gx = sin(k)·cos(kx)，误差 < 1e-12；gy < 1e-15
    // 测试目的：y 不变正弦场下梯度模板退化为精确中心差分

    let nx = 32;
    let grid = PeriodicGrid::new(nx, 5).unwrap();
    let k = 2.0 * PI / nx as f64;

    let mut f = vec![0.0; grid.len()];
    for y in 0..grid.ny() {
        for x in 0..nx {
            f[grid.idx(x, y)] = (k * x as f64).sin();
        }
    }

    let mut gx = vec![0.0; grid.len()];
    let mut gy = vec![0.0; grid.len()];
    gradient_serial(&grid, &f, &mut gx, &mut gy, 1.0);

    for y in 0..grid.ny() {
        for x in 0..nx {
            let i = grid.idx(x, y);
            let expected = k.sin() * (k * x as f64).cos();
            assert!(
                (gx[i] - expected).abs() < 1e-12,
                "gx[{x},{y}] = {} 期望 {}",
                gx[i],
                expected
            );
            assert!(gy[i].abs() < 1e-15, "y 不变场 gy[{x},{y}] = {}", gy[i]);
        }
    }
}

#[test]
fn test_laplacian_sine_wave_discrete_symbol() {
    // 验收标准：∇²f = 2(cos k − 1)·f，误差 < 1e-12
    // 测试目的：y 不变场下九点 Laplace 退化为一维二阶差分

    let nx = 32;
    let grid = PeriodicGrid::new(nx, 4).unwrap();
    let k = 2.0 * PI / nx as f64;

    let mut f = vec![0.0; grid.len()];
    for y in 0..grid.ny() {
        for x in 0..nx {
            f[grid.idx(x, y)] = (k * x as f64).sin();
        }
    }

    let mut lap = vec![0.0; grid.len()];
    laplacian_serial(&grid, &f, &mut lap, 1.0);

    let symbol = 2.0 * (k.cos() - 1.0);
    for i in 0..grid.len() {
        assert!(
            (lap[i] - symbol * f[i]).abs() < 1e-12,
            "lap[{}] = {} 期望 {}",
            i,
            lap[i],
            symbol * f[i]
        );
    }
}

#[test]
fn test_laplacian_two_dimensional_eigenfunction() {
    // 验收标准：sin(kx·x)sin(ky·y) 是离散本征函数，误差 < 1e-12
    // 测试目的：验证对角项权重（本征值含 cos kx·cos ky 交叉项）

    let (nx, ny) = (24, 16);
    let grid = PeriodicGrid::new(nx, ny).unwrap();
    let kx = 2.0 * PI / nx as f64;
    let ky = 2.0 * PI / ny as f64;

    let mut f = vec![0.0; grid.len()];
    for y in 0..ny {
        for x in 0..nx {
            f[grid.idx(x, y)] = (kx * x as f64).sin() * (ky * y as f64).sin();
        }
    }

    let mut lap = vec![0.0; grid.len()];
    laplacian_serial(&grid, &f, &mut lap, 1.0);

    let symbol = 4.0 / 3.0 * (kx.cos() + ky.cos()) + 2.0 / 3.0 * kx.cos() * ky.cos() - 10.0 / 3.0;
    // 连续极限校验：小 k 时本征值接近 −(kx² + ky²)
    let continuum = -(kx * kx + ky * ky);
    assert!(
        (symbol - continuum).abs() < 0.05 * continuum.abs(),
        "离散本征值 {} 偏离连续值 {}",
        symbol,
        continuum
    );

    for i in 0..grid.len() {
        assert!(
            (lap[i] - symbol * f[i]).abs() < 1e-12,
            "lap[{}] = {} 期望 {}",
            i,
            lap[i],
            symbol * f[i]
        );
    }
}

// ============================================================
// Test 3: Structural Properties
// ============================================================

#[test]
fn test_stencils_commute_with_torus_translation() {
    // 验收标准：平移输入后输出平移，逐位一致
    // 测试目的：周期回绕在所有格点（含边缘）的一致性

    let grid = PeriodicGrid::new(12, 8).unwrap();
    let f = seeded_field(grid.len(), 99);
    let (sx, sy) = (5i64, 3i64);

    let mut shifted = vec![0.0; grid.len()];
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            shifted[grid.idx(x, y)] = f[grid.idx_shifted(x, y, sx, sy)];
        }
    }

    let mut gx = vec![0.0; grid.len()];
    let mut gy = vec![0.0; grid.len()];
    let mut gx_s = vec![0.0; grid.len()];
    let mut gy_s = vec![0.0; grid.len()];
    gradient_serial(&grid, &f, &mut gx, &mut gy, 1.0);
    gradient_serial(&grid, &shifted, &mut gx_s, &mut gy_s, 1.0);

    let mut lap = vec![0.0; grid.len()];
    let mut lap_s = vec![0.0; grid.len()];
    laplacian_serial(&grid, &f, &mut lap, 1.0);
    laplacian_serial(&grid, &shifted, &mut lap_s, 1.0);

    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let here = grid.idx(x, y);
            let there = grid.idx_shifted(x, y, sx, sy);
            assert_eq!(gx_s[here], gx[there], "gx 平移破坏于 ({x},{y})");
            assert_eq!(gy_s[here], gy[there], "gy 平移破坏于 ({x},{y})");
            assert_eq!(lap_s[here], lap[there], "lap 平移破坏于 ({x},{y})");
        }
    }
}

#[test]
fn test_scale_matches_external_multiplication() {
    // scale=1 的输出恰为未缩放表达式，因此外乘 scale 逐位等于内折叠
    let grid = PeriodicGrid::new(9, 9).unwrap();
    let f = seeded_field(grid.len(), 3);
    let gamma = -0.01;

    let mut folded = vec![0.0; grid.len()];
    let mut unit = vec![0.0; grid.len()];
    laplacian_serial(&grid, &f, &mut folded, gamma);
    laplacian_serial(&grid, &f, &mut unit, 1.0);

    for i in 0..grid.len() {
        assert_eq!(folded[i], unit[i] * gamma, "scale 折叠不一致于 {i}");
    }
}

#[test]
fn test_laplacian_mean_vanishes_on_torus() {
    // 验收标准：环面上 Σ∇²f = 0（每个系数列和为零），|Σ| < 1e-11
    // 测试目的：周期模板无源汇

    let grid = PeriodicGrid::new(16, 32).unwrap();
    let f = seeded_field(grid.len(), 2024);

    let mut lap = vec![0.0; grid.len()];
    laplacian_serial(&grid, &f, &mut lap, 1.0);

    let total = KahanSum::sum_slice(&lap);
    println!("环面 Laplace 总和: {:.3e}", total);
    assert!(total.abs() < 1e-11, "环面守恒破坏: Σ = {:.3e}", total);
}

// ============================================================
// Test 4: Backend Dispatch Agreement
// ============================================================

#[test]
fn test_backends_agree_bitwise_across_all_operations() {
    // 验收标准：串行后端与强制并行后端全部算子逐位一致
    // 测试目的：行块划分不得改变任何格点的求值

    let grid = PeriodicGrid::new(17, 13).unwrap();
    let n = grid.len();
    let h = seeded_field(n, 11).iter().map(|v| 0.2 + v).collect::<Vec<_>>();
    let vx = seeded_field(n, 12).iter().map(|v| (v - 0.5) * 0.02).collect::<Vec<_>>();
    let vy = seeded_field(n, 13).iter().map(|v| (v - 0.5) * 0.02).collect::<Vec<_>>();
    let fx = seeded_field(n, 14).iter().map(|v| (v - 0.5) * 1e-4).collect::<Vec<_>>();
    let fy = seeded_field(n, 15).iter().map(|v| (v - 0.5) * 1e-4).collect::<Vec<_>>();

    let backends: [Box<dyn Backend<f64>>; 2] = [
        Box::new(SerialBackend),
        Box::new(ParallelBackend::with_threshold(1)),
    ];

    let mut results: Vec<(Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> = Vec::new();
    for backend in &backends {
        let mut gx = vec![0.0; n];
        let mut gy = vec![0.0; n];
        backend.gradient(&grid, &h, &mut gx, &mut gy, 1.0);

        let mut lap = vec![0.0; n];
        backend.laplacian(&grid, &h, &mut lap, -0.01);

        let mut f_eq = Populations::new(n);
        backend.equilibrium(&grid, &h, &vx, &vy, &mut f_eq);

        let mut f_pop = Populations::new(n);
        f_pop.copy_from(&f_eq);
        let mut f_tmp = Populations::new(n);
        backend.collide_stream(&grid, 0.8, &f_eq, &mut f_pop, &mut f_tmp, &fx, &fy);

        let mut h_out = vec![0.0; n];
        let mut vx_out = vec![0.0; n];
        let mut vy_out = vec![0.0; n];
        backend.moments(&grid, &f_pop, &mut h_out, &mut vx_out, &mut vy_out, 1e-12);

        results.push((gx, lap, h_out, vx_out, vy_out));
    }

    let (gx_a, lap_a, h_a, vx_a, vy_a) = &results[0];
    let (gx_b, lap_b, h_b, vx_b, vy_b) = &results[1];
    assert_eq!(gx_a, gx_b, "梯度后端不一致");
    assert_eq!(lap_a, lap_b, "Laplace 后端不一致");
    assert_eq!(h_a, h_b, "矩提取 h 后端不一致");
    assert_eq!(vx_a, vx_b, "矩提取 vx 后端不一致");
    assert_eq!(vy_a, vy_b, "矩提取 vy 后端不一致");
}
