// crates/flb_physics/src/measure.rs

//! 场观测量
//!
//! 对膜厚与速度场的只读诊断函数，供运行监控、测试与输出使用。
//! 总质量使用 Kahan 补偿求和，长时间漂移统计不受朴素求和的
//! 舍入累积影响。

use flb_foundation::{KahanSum, LatticeScalar};

use crate::grid::PeriodicGrid;

/// 总质量 Σh（Kahan 求和）
pub fn total_mass<S: LatticeScalar>(h: &[S]) -> S {
    KahanSum::sum_slice(h)
}

/// 膜厚最小值与最大值
pub fn height_extrema<S: LatticeScalar>(h: &[S]) -> (S, S) {
    let mut min = h[0];
    let mut max = h[0];
    for &v in &h[1..] {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    (min, max)
}

/// 最大速度模
pub fn max_speed<S: LatticeScalar>(vx: &[S], vy: &[S]) -> S {
    debug_assert_eq!(vx.len(), vy.len());
    let mut max_sq = S::ZERO;
    for i in 0..vx.len() {
        let s2 = vx[i] * vx[i] + vy[i] * vy[i];
        if s2 > max_sq {
            max_sq = s2;
        }
    }
    max_sq.sqrt()
}

/// 膜厚超过阈值的格点数
pub fn wetted_sites<S: LatticeScalar>(h: &[S], threshold: S) -> usize {
    h.iter().filter(|&&v| v > threshold).count()
}

/// 湿润面积占比
pub fn wetted_fraction<S: LatticeScalar>(h: &[S], threshold: S) -> S {
    let wet = wetted_sites(h, threshold);
    S::from_config(wet as f64 / h.len() as f64)
}

/// 第 `x` 列上的最小膜厚
///
/// 液滴合并实验中，接触点所在列的最小膜厚就是桥高 h₀(t)。
pub fn column_min<S: LatticeScalar>(grid: &PeriodicGrid, h: &[S], x: usize) -> S {
    debug_assert!(x < grid.nx());
    let mut min = h[grid.idx(x, 0)];
    for y in 1..grid.ny() {
        let v = h[grid.idx(x, y)];
        if v < min {
            min = v;
        }
    }
    min
}
