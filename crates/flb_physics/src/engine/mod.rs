// crates/flb_physics/src/engine/mod.rs

//! 求解器引擎
//!
//! 提供时间推进与运行期诊断：
//!
//! - `solver` - 主求解器（压力 → 梯度 → 合力 → 平衡分布 → 碰撞迁移 → 矩）
//! - `diagnostics` - 质量守恒跟踪

pub mod diagnostics;
pub mod solver;

// 重导出常用类型
pub use diagnostics::MassTracker;
pub use solver::{FilmSolver, RunSummary, StepReport};
