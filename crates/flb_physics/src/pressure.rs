// crates/flb_physics/src/pressure.rs

//! 薄膜压力模型
//!
//! 压力由两部分组成：
//!
//! ```text
//! p = −γ·∇²h + Π(h)
//! Π(h) = κ(θ)·[(h*/(h+h_c))^n − (h*/(h+h_c))^m]
//! κ(θ) = γ·(1 − cos(πθ))·(n−1)(m−1) / ((n−m)·h*)
//! ```
//!
//! 第一项是拉普拉斯压力（曲率驱动），第二项是析离压力，其零点在
//! `h = h* − h_c` 处，驱动薄膜向前驱膜厚度弛豫。接触角 θ 以 π 为
//! 单位给出。
//!
//! 接触角可以是整场均匀的，也可以逐格点给出（图案化润湿性）。
//! 两种情形的逐点算术完全相同，均匀场与常数图案给出逐位一致的结果。

use rayon::prelude::*;

use flb_foundation::{int_pow, FlbError, FlbResult, LatticeScalar};

use crate::backend::Backend;
use crate::grid::PeriodicGrid;
use crate::params::SystemParams;

/// 幂律析离压力（单点）
///
/// 指数为整数，使用逐次相乘而非 `powf`，保证跨平台可复现。
#[inline]
pub fn disjoining_pressure<S: LatticeScalar>(
    h: S,
    kappa: S,
    n: u32,
    m: u32,
    h_min: S,
    h_crit: S,
) -> S {
    let ratio = h_min / (h + h_crit);
    kappa * (int_pow(ratio, n) - int_pow(ratio, m))
}

/// κ(θ) 前置因子
fn contact_angle_prefactor<S: LatticeScalar>(gamma: S, theta: S, n: u32, m: u32, h_min: S) -> S {
    let pi = S::from_config(std::f64::consts::PI);
    let wet = S::ONE - (pi * theta).cos();
    let nf = S::from_config(f64::from(n));
    let mf = S::from_config(f64::from(m));
    gamma * wet * (nf - S::ONE) * (mf - S::ONE) / ((nf - mf) * h_min)
}

/// 接触角场：均匀或逐格点
#[derive(Debug, Clone)]
enum KappaField<S> {
    Uniform(S),
    PerSite(Vec<S>),
}

/// 薄膜压力计算器
///
/// 持有润湿性相关的全部派生常数，构造后只读。
#[derive(Debug, Clone)]
pub struct FilmPressure<S> {
    gamma: S,
    n: u32,
    m: u32,
    h_min: S,
    h_crit: S,
    kappa: KappaField<S>,
}

impl<S: LatticeScalar> FilmPressure<S> {
    /// 由系统参数构造（均匀接触角）
    pub fn new(params: &SystemParams<S>) -> Self {
        let w = &params.wetting;
        if w.h_crit == S::ZERO {
            log::warn!("h_crit 为零：完全干涸格点 (h=0) 的析离压力将发散");
        }
        let kappa = contact_angle_prefactor(params.gamma, w.theta, w.n, w.m, w.h_min);
        Self {
            gamma: params.gamma,
            n: w.n,
            m: w.m,
            h_min: w.h_min,
            h_crit: w.h_crit,
            kappa: KappaField::Uniform(kappa),
        }
    }

    /// 仅指定接触角，其余参数取默认值
    ///
    /// 与先改写 [`SystemParams`] 再调用 [`FilmPressure::new`] 逐位一致。
    pub fn with_default_wetting(theta: S) -> Self {
        let mut params = SystemParams::<S>::default();
        params.wetting.theta = theta;
        Self::new(&params)
    }

    /// 设定逐格点接触角（图案化润湿性）
    ///
    /// 每个 θ 必须位于 [0, 1]（以 π 为单位）。
    pub fn set_contact_angle_field(&mut self, grid: &PeriodicGrid, theta: &[S]) -> FlbResult<()> {
        if theta.len() != grid.len() {
            return Err(FlbError::size_mismatch(
                "contact_angle_field",
                grid.len(),
                theta.len(),
            ));
        }
        for &t in theta.iter() {
            if !(t >= S::ZERO && t <= S::ONE) {
                return Err(FlbError::out_of_range(
                    "contact_angle_field",
                    t.to_f64_lossy(),
                    0.0,
                    1.0,
                ));
            }
        }
        let field = theta
            .iter()
            .map(|&t| contact_angle_prefactor(self.gamma, t, self.n, self.m, self.h_min))
            .collect();
        self.kappa = KappaField::PerSite(field);
        Ok(())
    }

    /// 是否使用图案化接触角
    pub fn is_patterned(&self) -> bool {
        matches!(self.kappa, KappaField::PerSite(_))
    }

    /// 计算整场压力：`p = −γ∇²h + Π(h)`
    pub fn compute_into(
        &self,
        grid: &PeriodicGrid,
        backend: &dyn Backend<S>,
        h: &[S],
        p: &mut [S],
    ) {
        debug_assert_eq!(h.len(), grid.len());
        debug_assert_eq!(p.len(), grid.len());

        backend.laplacian(grid, h, p, -self.gamma);

        if backend.parallel_hint(grid.len()) {
            self.add_disjoining_parallel(grid, h, p);
        } else {
            self.add_disjoining_serial(h, p);
        }
    }

    fn add_disjoining_rows(&self, kappa_row: KappaRow<'_, S>, h: &[S], p: &mut [S]) {
        match kappa_row {
            KappaRow::Uniform(k) => {
                for i in 0..h.len() {
                    p[i] += disjoining_pressure(h[i], k, self.n, self.m, self.h_min, self.h_crit);
                }
            }
            KappaRow::PerSite(field) => {
                for i in 0..h.len() {
                    p[i] +=
                        disjoining_pressure(h[i], field[i], self.n, self.m, self.h_min, self.h_crit);
                }
            }
        }
    }

    fn add_disjoining_serial(&self, h: &[S], p: &mut [S]) {
        match &self.kappa {
            KappaField::Uniform(k) => self.add_disjoining_rows(KappaRow::Uniform(*k), h, p),
            KappaField::PerSite(field) => {
                self.add_disjoining_rows(KappaRow::PerSite(field), h, p)
            }
        }
    }

    fn add_disjoining_parallel(&self, grid: &PeriodicGrid, h: &[S], p: &mut [S]) {
        let nx = grid.nx();
        p.par_chunks_mut(nx).enumerate().for_each(|(y, pr)| {
            let row = y * nx;
            let end = row + pr.len();
            let kappa_row = match &self.kappa {
                KappaField::Uniform(k) => KappaRow::Uniform(*k),
                KappaField::PerSite(field) => KappaRow::PerSite(&field[row..end]),
            };
            self.add_disjoining_rows(kappa_row, &h[row..end], pr);
        });
    }
}

/// 单行的接触角视图，串行与并行路径共用
enum KappaRow<'a, S> {
    Uniform(S),
    PerSite(&'a [S]),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ParallelBackend, SerialBackend};

    fn flat_height(n: usize, h0: f64) -> Vec<f64> {
        vec![h0; n]
    }

    #[test]
    fn test_disjoining_root_at_precursor_height() {
        // h = h* − h_c 时 ratio = 1，Π 精确为零
        let w = crate::params::WettingParams::<f64>::default();
        let h = w.h_min - w.h_crit;
        let pi_h = disjoining_pressure(h, 1.7, w.n, w.m, w.h_min, w.h_crit);
        assert_eq!(pi_h, 0.0, "析离压力在前驱膜厚度处必须精确为零");
    }

    #[test]
    fn test_disjoining_sign_change_around_root() {
        let w = crate::params::WettingParams::<f64>::default();
        let root = w.h_min - w.h_crit;
        let thinner = disjoining_pressure(root - 0.02, 1.0, w.n, w.m, w.h_min, w.h_crit);
        let thicker = disjoining_pressure(root + 0.5, 1.0, w.n, w.m, w.h_min, w.h_crit);
        assert!(thinner > 0.0, "过薄区域应被推回: Π = {}", thinner);
        assert!(thicker < 0.0, "过厚区域应被拉平: Π = {}", thicker);
    }

    #[test]
    fn test_theta_only_constructor_matches_general_path() {
        let grid = PeriodicGrid::new(8, 8).unwrap();
        let n = grid.len();
        let h: Vec<f64> = (0..n).map(|i| 0.3 + 0.05 * ((i % 7) as f64)).collect();
        let backend = SerialBackend;

        let mut params = SystemParams::<f64>::default();
        params.wetting.theta = 0.3;
        let general = FilmPressure::new(&params);
        let shorthand = FilmPressure::with_default_wetting(0.3);

        let mut p1 = vec![0.0; n];
        let mut p2 = vec![0.0; n];
        general.compute_into(&grid, &backend, &h, &mut p1);
        shorthand.compute_into(&grid, &backend, &h, &mut p2);

        assert_eq!(p1, p2, "θ 简写构造与通用构造必须逐位一致");
    }

    #[test]
    fn test_flat_film_pressure_is_pure_disjoining() {
        // 平坦膜的拉普拉斯项为零（至舍入），压力就是 Π(h0)
        let grid = PeriodicGrid::new(6, 6).unwrap();
        let n = grid.len();
        let h0 = 0.7;
        let h = flat_height(n, h0);
        let backend = SerialBackend;

        let params = SystemParams::<f64>::default();
        let pressure = FilmPressure::new(&params);
        let mut p = vec![0.0; n];
        pressure.compute_into(&grid, &backend, &h, &mut p);

        let w = params.wetting;
        let kappa = contact_angle_prefactor(params.gamma, w.theta, w.n, w.m, w.h_min);
        let expected = disjoining_pressure(h0, kappa, w.n, w.m, w.h_min, w.h_crit);
        for (i, &v) in p.iter().enumerate() {
            assert!(
                (v - expected).abs() < 1e-12,
                "平坦膜压力错误，索引 {}: {} vs {}",
                i,
                v,
                expected
            );
        }
    }

    #[test]
    fn test_patterned_matches_uniform_per_region() {
        // 左右两半不同接触角：每一半与对应的均匀场逐位一致
        let grid = PeriodicGrid::new(8, 4).unwrap();
        let n = grid.len();
        let h: Vec<f64> = (0..n).map(|i| 0.4 + 0.03 * ((i % 5) as f64)).collect();
        let backend = SerialBackend;

        let theta_a = 0.1;
        let theta_b = 0.6;
        let mut theta = vec![theta_a; n];
        for y in 0..grid.ny() {
            for x in 4..grid.nx() {
                theta[grid.idx(x, y)] = theta_b;
            }
        }

        let mut patterned = FilmPressure::with_default_wetting(theta_a);
        patterned.set_contact_angle_field(&grid, &theta).unwrap();
        assert!(patterned.is_patterned());

        let uniform_a = FilmPressure::with_default_wetting(theta_a);
        let uniform_b = FilmPressure::with_default_wetting(theta_b);

        let mut p_pat = vec![0.0; n];
        let mut p_a = vec![0.0; n];
        let mut p_b = vec![0.0; n];
        patterned.compute_into(&grid, &backend, &h, &mut p_pat);
        uniform_a.compute_into(&grid, &backend, &h, &mut p_a);
        uniform_b.compute_into(&grid, &backend, &h, &mut p_b);

        for y in 0..grid.ny() {
            for x in 0..grid.nx() {
                let i = grid.idx(x, y);
                let expected = if x < 4 { p_a[i] } else { p_b[i] };
                assert_eq!(p_pat[i], expected, "图案化压力错误 ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_set_contact_angle_field_rejects_bad_input() {
        let grid = PeriodicGrid::new(4, 4).unwrap();
        let mut pressure = FilmPressure::<f64>::with_default_wetting(0.2);

        let wrong_len = vec![0.2; 5];
        assert!(pressure.set_contact_angle_field(&grid, &wrong_len).is_err());

        let mut out_of_range = vec![0.2; 16];
        out_of_range[7] = 1.5;
        assert!(pressure
            .set_contact_angle_field(&grid, &out_of_range)
            .is_err());

        let mut with_nan = vec![0.2; 16];
        with_nan[3] = f64::NAN;
        assert!(pressure.set_contact_angle_field(&grid, &with_nan).is_err());
    }

    #[test]
    fn test_larger_contact_angle_gives_stronger_disjoining() {
        let grid = PeriodicGrid::new(5, 5).unwrap();
        let n = grid.len();
        let h = flat_height(n, 1.0);
        let backend = SerialBackend;

        let weak = FilmPressure::with_default_wetting(0.1);
        let strong = FilmPressure::with_default_wetting(0.6);
        let mut p_weak = vec![0.0; n];
        let mut p_strong = vec![0.0; n];
        weak.compute_into(&grid, &backend, &h, &mut p_weak);
        strong.compute_into(&grid, &backend, &h, &mut p_strong);

        // h=1 远厚于前驱膜，Π < 0，角越大越强
        assert!(p_strong[0] < p_weak[0]);
        assert!(p_weak[0] < 0.0);
    }

    #[test]
    fn test_parallel_disjoining_matches_serial_bitwise() {
        let grid = PeriodicGrid::new(16, 12).unwrap();
        let n = grid.len();
        let h: Vec<f64> = (0..n).map(|i| 0.2 + 0.01 * ((i % 19) as f64)).collect();

        let pressure = FilmPressure::<f64>::with_default_wetting(0.25);
        let serial = SerialBackend;
        let parallel = ParallelBackend::with_threshold(1);

        let mut p_s = vec![0.0; n];
        let mut p_p = vec![0.0; n];
        pressure.compute_into(&grid, &serial, &h, &mut p_s);
        pressure.compute_into(&grid, &parallel, &h, &mut p_p);

        assert_eq!(p_s, p_p);
    }

    #[test]
    fn test_zero_hcrit_is_finite_for_positive_height() {
        let mut params = SystemParams::<f64>::default();
        params.wetting.h_crit = 0.0;
        let pressure = FilmPressure::new(&params);

        let grid = PeriodicGrid::new(4, 4).unwrap();
        let h = flat_height(grid.len(), 0.5);
        let mut p = vec![0.0; grid.len()];
        pressure.compute_into(&grid, &SerialBackend, &h, &mut p);
        assert!(p.iter().all(|v| v.is_finite()));
    }
}
