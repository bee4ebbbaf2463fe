// crates/flb_physics/src/state.rs

//! 薄膜态与分布函数缓冲
//!
//! 本模块提供求解器的全部可变状态：
//! - Populations: 九个方向平面的分布函数缓冲（SoA 布局）
//! - FilmState: 宏观场 + 三块分布缓冲（f_eq / f_pop / f_tmp）
//! - StateError: 状态校验错误
//!
//! # 布局设计
//!
//! 分布函数按方向平面连续存放，同一方向的所有格点相邻：
//!
//! ```text
//! data: [f0_0, f0_1, ..., f0_{n-1} | f1_0, ..., f1_{n-1} | ... | f8_{n-1}]
//! ```
//!
//! 碰撞、迁移与矩计算都按平面逐行访问，SoA 布局保证这些核函数
//! 的内层循环是连续内存扫描。
//!
//! # 缓冲职责
//!
//! | 缓冲    | 写入者       | 读取者       |
//! | ------- | ------------ | ------------ |
//! | `f_eq`  | 平衡分布计算 | 碰撞         |
//! | `f_pop` | 迁移         | 碰撞、矩计算 |
//! | `f_tmp` | 碰撞         | 迁移         |

use flb_foundation::{FlbError, KahanSum, LatticeScalar};

use crate::grid::PeriodicGrid;
use crate::lattice::Q;

// ============================================================
// 分布函数缓冲
// ============================================================

/// D2Q9 分布函数缓冲（平面连续的 SoA 布局）
#[derive(Debug, Clone)]
pub struct Populations<S> {
    /// 长度恒为 `Q * sites`
    data: Vec<S>,
    sites: usize,
}

impl<S: LatticeScalar> Populations<S> {
    /// 创建零初始化的缓冲
    pub fn new(sites: usize) -> Self {
        Self {
            data: vec![S::ZERO; Q * sites],
            sites,
        }
    }

    /// 每个平面的格点数
    #[inline]
    pub fn sites(&self) -> usize {
        self.sites
    }

    /// 第 `k` 个方向平面
    #[inline]
    pub fn plane(&self, k: usize) -> &[S] {
        let n = self.sites;
        &self.data[k * n..(k + 1) * n]
    }

    /// 第 `k` 个方向平面（可变）
    #[inline]
    pub fn plane_mut(&mut self, k: usize) -> &mut [S] {
        let n = self.sites;
        &mut self.data[k * n..(k + 1) * n]
    }

    /// 全部九个平面
    pub fn planes(&self) -> [&[S]; Q] {
        let n = self.sites;
        let d = &self.data;
        [
            &d[0..n],
            &d[n..2 * n],
            &d[2 * n..3 * n],
            &d[3 * n..4 * n],
            &d[4 * n..5 * n],
            &d[5 * n..6 * n],
            &d[6 * n..7 * n],
            &d[7 * n..8 * n],
            &d[8 * n..9 * n],
        ]
    }

    /// 全部九个平面（可变，互不重叠）
    pub fn planes_mut(&mut self) -> [&mut [S]; Q] {
        let n = self.sites;
        let (p0, rest) = self.data.split_at_mut(n);
        let (p1, rest) = rest.split_at_mut(n);
        let (p2, rest) = rest.split_at_mut(n);
        let (p3, rest) = rest.split_at_mut(n);
        let (p4, rest) = rest.split_at_mut(n);
        let (p5, rest) = rest.split_at_mut(n);
        let (p6, rest) = rest.split_at_mut(n);
        let (p7, p8) = rest.split_at_mut(n);
        [p0, p1, p2, p3, p4, p5, p6, p7, p8]
    }

    /// 用同一个值填充全部平面
    pub fn fill(&mut self, value: S) {
        self.data.fill(value);
    }

    /// 从另一缓冲整体复制（尺寸必须一致）
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.sites, other.sites);
        self.data.copy_from_slice(&other.data);
    }

    /// 底层连续存储
    #[inline]
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }
}

// ============================================================
// 薄膜态
// ============================================================

/// 薄膜求解器的完整状态
///
/// 宏观场（膜厚、速度、压力、力）与三块分布缓冲共同组成一个
/// 自洽的时间步输入/输出。除膜厚外的场均由求解器在每步内重建，
/// 外部只需通过 [`FilmState::set_height`] 设定初始膜厚。
#[derive(Debug, Clone)]
pub struct FilmState<S> {
    grid: PeriodicGrid,

    /// 膜厚 h
    pub(crate) height: Vec<S>,
    /// x 方向速度
    pub(crate) vel_x: Vec<S>,
    /// y 方向速度
    pub(crate) vel_y: Vec<S>,
    /// 薄膜压力 p = −γ∇²h + Π(h)
    pub(crate) pressure: Vec<S>,
    /// 压力梯度
    pub(crate) grad_p_x: Vec<S>,
    pub(crate) grad_p_y: Vec<S>,
    /// 当前步合力
    pub(crate) force_x: Vec<S>,
    pub(crate) force_y: Vec<S>,

    pub(crate) f_eq: Populations<S>,
    pub(crate) f_pop: Populations<S>,
    pub(crate) f_tmp: Populations<S>,
}

impl<S: LatticeScalar> FilmState<S> {
    /// 创建零初始化的状态
    pub fn new(grid: PeriodicGrid) -> Self {
        let n = grid.len();
        Self {
            grid,
            height: vec![S::ZERO; n],
            vel_x: vec![S::ZERO; n],
            vel_y: vec![S::ZERO; n],
            pressure: vec![S::ZERO; n],
            grad_p_x: vec![S::ZERO; n],
            grad_p_y: vec![S::ZERO; n],
            force_x: vec![S::ZERO; n],
            force_y: vec![S::ZERO; n],
            f_eq: Populations::new(n),
            f_pop: Populations::new(n),
            f_tmp: Populations::new(n),
        }
    }

    /// 网格描述
    #[inline]
    pub fn grid(&self) -> PeriodicGrid {
        self.grid
    }

    /// 设定初始膜厚
    ///
    /// 输入必须与网格尺寸一致、处处有限且非负。
    pub fn set_height(&mut self, h: &[S]) -> Result<(), StateError> {
        if h.len() != self.height.len() {
            return Err(StateError::SizeMismatch {
                field: "height",
                expected: self.height.len(),
                actual: h.len(),
            });
        }
        for (i, &v) in h.iter().enumerate() {
            if !v.is_finite() {
                return Err(StateError::NonFinite {
                    field: "height",
                    index: i,
                    value: v.to_f64_lossy(),
                });
            }
            if v < S::ZERO {
                return Err(StateError::NegativeHeight {
                    index: i,
                    value: v.to_f64_lossy(),
                });
            }
        }
        self.height.copy_from_slice(h);
        Ok(())
    }

    /// 膜厚场
    #[inline]
    pub fn height(&self) -> &[S] {
        &self.height
    }

    /// x 方向速度场
    #[inline]
    pub fn velocity_x(&self) -> &[S] {
        &self.vel_x
    }

    /// y 方向速度场
    #[inline]
    pub fn velocity_y(&self) -> &[S] {
        &self.vel_y
    }

    /// 薄膜压力场（上一次时间步计算的值）
    #[inline]
    pub fn pressure(&self) -> &[S] {
        &self.pressure
    }

    /// 总质量（Kahan 补偿求和）
    pub fn total_mass(&self) -> S {
        KahanSum::sum_slice(&self.height)
    }

    /// 单遍扫描的统计摘要
    pub fn summary(&self) -> StateSummary<S> {
        let mut mass = KahanSum::new();
        let mut min_h = self.height[0];
        let mut max_h = self.height[0];
        let mut max_speed_sq = S::ZERO;

        for i in 0..self.height.len() {
            let h = self.height[i];
            mass.add(h);
            if h < min_h {
                min_h = h;
            }
            if h > max_h {
                max_h = h;
            }
            let vx = self.vel_x[i];
            let vy = self.vel_y[i];
            let s2 = vx * vx + vy * vy;
            if s2 > max_speed_sq {
                max_speed_sq = s2;
            }
        }

        StateSummary {
            total_mass: mass.value(),
            min_height: min_h,
            max_height: max_h,
            max_speed: max_speed_sq.sqrt(),
        }
    }

    /// 校验全部场的数值健康
    ///
    /// 返回第一个发现的问题：NaN/Inf 或负膜厚。
    pub fn validate(&self) -> Result<(), StateError> {
        let fields: [(&'static str, &[S]); 4] = [
            ("height", &self.height),
            ("vel_x", &self.vel_x),
            ("vel_y", &self.vel_y),
            ("pressure", &self.pressure),
        ];
        for (name, data) in fields {
            if let Err((index, value)) = S::validate_slice(data) {
                return Err(StateError::NonFinite {
                    field: name,
                    index,
                    value: value.to_f64_lossy(),
                });
            }
        }
        if let Err((index, value)) = S::validate_slice(self.f_pop.as_slice()) {
            return Err(StateError::NonFinite {
                field: "f_pop",
                index,
                value: value.to_f64_lossy(),
            });
        }
        for (i, &h) in self.height.iter().enumerate() {
            if h < S::ZERO {
                return Err(StateError::NegativeHeight {
                    index: i,
                    value: h.to_f64_lossy(),
                });
            }
        }
        Ok(())
    }
}

/// [`FilmState::summary`] 的结果
#[derive(Debug, Clone, Copy)]
pub struct StateSummary<S> {
    /// 总质量 Σh
    pub total_mass: S,
    /// 最小膜厚
    pub min_height: S,
    /// 最大膜厚
    pub max_height: S,
    /// 最大速度模
    pub max_speed: S,
}

// ============================================================
// 错误类型
// ============================================================

/// 状态错误
#[derive(Debug, Clone)]
pub enum StateError {
    /// 无效值 (NaN/Inf)
    NonFinite {
        field: &'static str,
        index: usize,
        value: f64,
    },
    /// 负膜厚
    NegativeHeight { index: usize, value: f64 },
    /// 尺寸不匹配
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite {
                field,
                index,
                value,
            } => {
                write!(f, "Non-finite {} at site {} (value={})", field, index, value)
            }
            Self::NegativeHeight { index, value } => {
                write!(f, "Negative film height at site {} (h={})", index, value)
            }
            Self::SizeMismatch {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Size mismatch for {}: expected {} sites, got {}",
                    field, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for StateError {}

impl From<StateError> for FlbError {
    fn from(err: StateError) -> Self {
        FlbError::validation(err.to_string())
    }
}
