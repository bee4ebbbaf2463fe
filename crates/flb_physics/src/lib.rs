// filmlb\crates\flb_physics\src/lib.rs

//! 薄膜格子 Boltzmann 物理核心
//!
//! 在双周期二维网格上用 D2Q9 格子 Boltzmann 离散求解浅水型薄膜演化方程，
//! 包括：
//! - 离散速度集 (lattice)
//! - 周期网格索引 (grid)
//! - 九点差分算子 (stencil) - 梯度与 Laplace 算子
//! - 薄膜压力模型 (pressure) - 毛细项 + 分离压力
//! - 平衡分布 (equilibrium)
//! - 碰撞与迁移 (collide) - BGK 弛豫、强迫注入、周期 gather
//! - 宏观矩提取 (moments)
//! - 执行后端 (backend) - 串行 / rayon 并行
//! - 外部强迫项 (forcing) - 滑移摩擦、热涨落、倾斜体积力
//! - 模拟状态与推进引擎 (state / engine)
//! - 初始条件与观测量 (init / measure)
//!
//! # 每步调用序列
//!
//! 压力模型 → 压力梯度 → 力组装 → 碰撞迁移 → 矩提取，
//! 由 [`engine::FilmSolver::step`] 编排，时间步之间严格串行。

pub mod backend;
pub mod collide;
pub mod engine;
pub mod equilibrium;
pub mod forcing;
pub mod grid;
pub mod init;
pub mod lattice;
pub mod measure;
pub mod moments;
pub mod params;
pub mod pressure;
pub mod state;
pub mod stencil;

// 重导出常用类型
pub use backend::{Backend, ParallelBackend, SerialBackend};
pub use engine::{FilmSolver, MassTracker, RunSummary, StepReport};
pub use grid::PeriodicGrid;
pub use params::{ParamsError, SystemParams, WettingParams};
pub use pressure::FilmPressure;
pub use state::{FilmState, Populations, StateError};

// 重导出强迫项类型
pub use forcing::{
    ForceContext, ForceTerm, InclinationForce, SlippageForce, ThermalFluctuation,
};
