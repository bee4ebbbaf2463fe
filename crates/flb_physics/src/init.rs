// crates/flb_physics/src/init.rs

//! 初始膜厚构造
//!
//! 所有构造函数返回一块新的膜厚场，内部以 f64 计算几何再转换到
//! 目标精度，f32 与 f64 运行使用同一套初值几何。
//!
//! 液滴与液脊采用球冠 / 柱冠轮廓：
//!
//! ```text
//! R_s = R / sin(πθ)
//! h(r) = max(h_p, sqrt(R_s² − r²) − R_s·cos(πθ))    (r ≤ R)
//! ```
//!
//! 其中 R 为接触线半径，h_p 为前驱膜厚度。距离使用周期最小像，
//! 贴近边界的液滴会正确地跨越边界。

use flb_foundation::{FlbError, FlbResult, LatticeScalar};

use crate::grid::PeriodicGrid;

/// 周期方向上的最小像距离
fn wrapped_distance(a: usize, b: usize, period: usize) -> f64 {
    let d = a.abs_diff(b);
    d.min(period - d) as f64
}

/// 均匀平膜
pub fn flat_film<S: LatticeScalar>(grid: &PeriodicGrid, h0: S) -> FlbResult<Vec<S>> {
    FlbError::check_positive("h0", h0.to_f64_lossy())?;
    Ok(vec![h0; grid.len()])
}

/// 正弦扰动平膜
///
/// ```text
/// h(x, y) = h0·(1 + a·sin(2π·w_x·x/nx) + a·sin(2π·w_y·y/ny))
/// ```
///
/// `waves_x` / `waves_y` 为整数波数，为零的方向不施加扰动。
/// 扰动过强导致膜厚非正时返回错误。
pub fn perturbed_film<S: LatticeScalar>(
    grid: &PeriodicGrid,
    h0: S,
    amplitude: f64,
    waves_x: u32,
    waves_y: u32,
) -> FlbResult<Vec<S>> {
    FlbError::check_positive("h0", h0.to_f64_lossy())?;
    let h0 = h0.to_f64_lossy();
    let nx = grid.nx() as f64;
    let ny = grid.ny() as f64;
    let kx = 2.0 * std::f64::consts::PI * f64::from(waves_x) / nx;
    let ky = 2.0 * std::f64::consts::PI * f64::from(waves_y) / ny;

    let mut field = Vec::with_capacity(grid.len());
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let wave = amplitude * (kx * x as f64).sin() + amplitude * (ky * y as f64).sin();
            let h = h0 * (1.0 + wave);
            if h <= 0.0 {
                return Err(FlbError::invalid_input(format!(
                    "扰动过强：({}, {}) 处膜厚为 {}",
                    x, y, h
                )));
            }
            field.push(S::from_config(h));
        }
    }
    Ok(field)
}

/// 球冠单液滴
///
/// `theta` 以 π 为单位；`theta = 0` 退化为纯前驱膜。
pub fn single_droplet<S: LatticeScalar>(
    grid: &PeriodicGrid,
    radius: f64,
    theta: f64,
    center: (usize, usize),
    h_precursor: f64,
) -> FlbResult<Vec<S>> {
    FlbError::check_positive("radius", radius)?;
    FlbError::check_positive("h_precursor", h_precursor)?;
    FlbError::check_range("theta", theta, 0.0, 1.0)?;

    let (cx, cy) = center;
    if cx >= grid.nx() || cy >= grid.ny() {
        return Err(FlbError::invalid_input(format!(
            "液滴中心 ({}, {}) 超出网格 {}x{}",
            cx,
            cy,
            grid.nx(),
            grid.ny()
        )));
    }

    if theta == 0.0 {
        return Ok(vec![S::from_config(h_precursor); grid.len()]);
    }

    let angle = std::f64::consts::PI * theta;
    let sphere_r = radius / angle.sin();
    let cap_offset = sphere_r * angle.cos();

    let mut field = Vec::with_capacity(grid.len());
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let dx = wrapped_distance(x, cx, grid.nx());
            let dy = wrapped_distance(y, cy, grid.ny());
            let r2 = dx * dx + dy * dy;
            let h = if r2 <= radius * radius {
                let cap = (sphere_r * sphere_r - r2).sqrt() - cap_offset;
                cap.max(h_precursor)
            } else {
                h_precursor
            };
            field.push(S::from_config(h));
        }
    }
    Ok(field)
}

/// 两个球冠液滴（逐点取最大值合并）
pub fn two_droplets<S: LatticeScalar>(
    grid: &PeriodicGrid,
    radius: f64,
    theta: f64,
    centers: [(usize, usize); 2],
    h_precursor: f64,
) -> FlbResult<Vec<S>> {
    let a = single_droplet(grid, radius, theta, centers[0], h_precursor)?;
    let b = single_droplet(grid, radius, theta, centers[1], h_precursor)?;
    Ok(merge_max(&a, &b))
}

/// 沿 y 不变的柱冠液脊
///
/// 与 [`single_droplet`] 同一轮廓，但只在 x 方向取距离。
pub fn rivulet<S: LatticeScalar>(
    grid: &PeriodicGrid,
    radius: f64,
    theta: f64,
    cx: usize,
    h_precursor: f64,
) -> FlbResult<Vec<S>> {
    FlbError::check_positive("radius", radius)?;
    FlbError::check_positive("h_precursor", h_precursor)?;
    FlbError::check_range("theta", theta, 0.0, 1.0)?;
    if cx >= grid.nx() {
        return Err(FlbError::invalid_input(format!(
            "液脊中心 {} 超出网格宽度 {}",
            cx,
            grid.nx()
        )));
    }

    if theta == 0.0 {
        return Ok(vec![S::from_config(h_precursor); grid.len()]);
    }

    let angle = std::f64::consts::PI * theta;
    let sphere_r = radius / angle.sin();
    let cap_offset = sphere_r * angle.cos();

    let mut profile = Vec::with_capacity(grid.nx());
    for x in 0..grid.nx() {
        let dx = wrapped_distance(x, cx, grid.nx());
        let h = if dx <= radius {
            let cap = (sphere_r * sphere_r - dx * dx).sqrt() - cap_offset;
            cap.max(h_precursor)
        } else {
            h_precursor
        };
        profile.push(S::from_config(h));
    }

    let mut field = Vec::with_capacity(grid.len());
    for _y in 0..grid.ny() {
        field.extend_from_slice(&profile);
    }
    Ok(field)
}

/// 逐点取最大值合并两块膜厚场
pub fn merge_max<S: LatticeScalar>(a: &[S], b: &[S]) -> Vec<S> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| if x > y { x } else { y })
        .collect()
}
