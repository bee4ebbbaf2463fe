// crates/flb_physics/src/backend.rs

//! 计算后端抽象
//!
//! 将五个核心算子（梯度、拉普拉斯、平衡分布、碰撞迁移、矩计算）
//! 收拢到一个对象安全的 trait 后面。求解器只通过 `&dyn Backend<S>`
//! 调度核函数，后端在运行时选择，算法代码不感知执行方式。
//!
//! 串行与并行后端共用同一套按行核函数，同一输入给出逐位一致的
//! 结果，后端选择只影响执行速度。所有方法使用 `&self` 实例方法。

use flb_foundation::LatticeScalar;

use crate::grid::PeriodicGrid;
use crate::state::Populations;
use crate::{collide, equilibrium, moments, stencil};

/// 并行后端的默认规模门限（格点数）
///
/// 小于该规模时 rayon 的任务开销超过收益，退回串行核。
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// 计算后端 trait
///
/// 方法集合与一个时间步内的核函数一一对应。实现必须保证：
/// 相同输入在不同后端上产生逐位一致的输出。
pub trait Backend<S: LatticeScalar>: Send + Sync {
    /// 后端名称
    fn name(&self) -> &'static str;

    /// 对给定规模，本后端的其它逐点循环是否也应并行执行
    fn parallel_hint(&self, sites: usize) -> bool;

    /// 中心差分梯度，`scale` 为统一乘子
    fn gradient(&self, grid: &PeriodicGrid, f: &[S], gx: &mut [S], gy: &mut [S], scale: S);

    /// 九点拉普拉斯，`out = scale·∇²f`
    fn laplacian(&self, grid: &PeriodicGrid, f: &[S], out: &mut [S], scale: S);

    /// 平衡分布
    fn equilibrium(
        &self,
        grid: &PeriodicGrid,
        h: &[S],
        vx: &[S],
        vy: &[S],
        f_eq: &mut Populations<S>,
    );

    /// BGK 碰撞 + 周期迁移
    #[allow(clippy::too_many_arguments)]
    fn collide_stream(
        &self,
        grid: &PeriodicGrid,
        tau: S,
        f_eq: &Populations<S>,
        f_pop: &mut Populations<S>,
        f_tmp: &mut Populations<S>,
        force_x: &[S],
        force_y: &[S],
    );

    /// 宏观量提取
    #[allow(clippy::too_many_arguments)]
    fn moments(
        &self,
        grid: &PeriodicGrid,
        f_pop: &Populations<S>,
        h: &mut [S],
        vx: &mut [S],
        vy: &mut [S],
        floor: S,
    );
}

// ============================================================
// 串行后端
// ============================================================

/// 串行后端（无状态零大小类型）
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialBackend;

impl<S: LatticeScalar> Backend<S> for SerialBackend {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn parallel_hint(&self, _sites: usize) -> bool {
        false
    }

    fn gradient(&self, grid: &PeriodicGrid, f: &[S], gx: &mut [S], gy: &mut [S], scale: S) {
        stencil::gradient_serial(grid, f, gx, gy, scale);
    }

    fn laplacian(&self, grid: &PeriodicGrid, f: &[S], out: &mut [S], scale: S) {
        stencil::laplacian_serial(grid, f, out, scale);
    }

    fn equilibrium(
        &self,
        grid: &PeriodicGrid,
        h: &[S],
        vx: &[S],
        vy: &[S],
        f_eq: &mut Populations<S>,
    ) {
        equilibrium::equilibrium_serial(grid, h, vx, vy, f_eq);
    }

    fn collide_stream(
        &self,
        grid: &PeriodicGrid,
        tau: S,
        f_eq: &Populations<S>,
        f_pop: &mut Populations<S>,
        f_tmp: &mut Populations<S>,
        force_x: &[S],
        force_y: &[S],
    ) {
        collide::collide_stream_serial(grid, tau, f_eq, f_pop, f_tmp, force_x, force_y);
    }

    fn moments(
        &self,
        grid: &PeriodicGrid,
        f_pop: &Populations<S>,
        h: &mut [S],
        vx: &mut [S],
        vy: &mut [S],
        floor: S,
    ) {
        moments::moments_serial(grid, f_pop, h, vx, vy, floor);
    }
}

// ============================================================
// rayon 并行后端
// ============================================================

/// rayon 并行后端
///
/// 小于门限的网格退回串行核，避免任务开销压过并行收益。
/// 两条路径的结果逐位一致，门限取值不影响数值。
#[derive(Debug, Clone, Copy)]
pub struct ParallelBackend {
    threshold: usize,
}

impl Default for ParallelBackend {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelBackend {
    /// 使用默认门限
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定并行门限（格点数）
    pub fn with_threshold(threshold: usize) -> Self {
        Self { threshold }
    }

    #[inline]
    fn should_parallelize(&self, sites: usize) -> bool {
        sites >= self.threshold
    }
}

impl<S: LatticeScalar> Backend<S> for ParallelBackend {
    fn name(&self) -> &'static str {
        "rayon"
    }

    fn parallel_hint(&self, sites: usize) -> bool {
        self.should_parallelize(sites)
    }

    fn gradient(&self, grid: &PeriodicGrid, f: &[S], gx: &mut [S], gy: &mut [S], scale: S) {
        if self.should_parallelize(grid.len()) {
            stencil::gradient_parallel(grid, f, gx, gy, scale);
        } else {
            stencil::gradient_serial(grid, f, gx, gy, scale);
        }
    }

    fn laplacian(&self, grid: &PeriodicGrid, f: &[S], out: &mut [S], scale: S) {
        if self.should_parallelize(grid.len()) {
            stencil::laplacian_parallel(grid, f, out, scale);
        } else {
            stencil::laplacian_serial(grid, f, out, scale);
        }
    }

    fn equilibrium(
        &self,
        grid: &PeriodicGrid,
        h: &[S],
        vx: &[S],
        vy: &[S],
        f_eq: &mut Populations<S>,
    ) {
        if self.should_parallelize(grid.len()) {
            equilibrium::equilibrium_parallel(grid, h, vx, vy, f_eq);
        } else {
            equilibrium::equilibrium_serial(grid, h, vx, vy, f_eq);
        }
    }

    fn collide_stream(
        &self,
        grid: &PeriodicGrid,
        tau: S,
        f_eq: &Populations<S>,
        f_pop: &mut Populations<S>,
        f_tmp: &mut Populations<S>,
        force_x: &[S],
        force_y: &[S],
    ) {
        if self.should_parallelize(grid.len()) {
            collide::collide_stream_parallel(grid, tau, f_eq, f_pop, f_tmp, force_x, force_y);
        } else {
            collide::collide_stream_serial(grid, tau, f_eq, f_pop, f_tmp, force_x, force_y);
        }
    }

    fn moments(
        &self,
        grid: &PeriodicGrid,
        f_pop: &Populations<S>,
        h: &mut [S],
        vx: &mut [S],
        vy: &mut [S],
        floor: S,
    ) {
        if self.should_parallelize(grid.len()) {
            moments::moments_parallel(grid, f_pop, h, vx, vy, floor);
        } else {
            moments::moments_serial(grid, f_pop, h, vx, vy, floor);
        }
    }
}
