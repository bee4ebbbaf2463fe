// crates/flb_config/src/lib.rs

//! FilmLB Config Layer (Layer 3)
//!
//! 配置层，提供精度选择、模拟配置和运行时多态接口。
//! 本层对外不暴露泛型，使用 `Precision` 枚举进行运行时精度分发。
//!
//! # 模块概览
//!
//! - [`precision`]: Precision 枚举（F32/F64）
//! - [`sim_config`]: SimConfig 模拟配置（全 f64，JSON 可序列化）
//! - [`builder`]: DynSimulation trait 与精度分发构建器
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: flb_cli        ─> uses SimConfig, Box<dyn DynSimulation>
//! Layer 3: flb_config     ─> Precision, SimConfig, build_simulation (本层)
//! Layer 2: flb_physics    ─> FilmSolver<S>, Backend<S>
//! Layer 1: flb_foundation ─> FlbError, LatticeScalar
//! ```
//!
//! # 设计原则
//!
//! 1. **全 f64 配置**: SimConfig 中所有数值使用 f64，构建时转换到目标精度
//! 2. **运行时分发**: 通过 Precision 枚举选择 f32/f64
//! 3. **Trait 对象**: 通过 `Box<dyn DynSimulation>` 实现多态

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod precision;
pub mod sim_config;

/// 层级标识
pub const LAYER: u8 = 3;

// 重导出核心类型
pub use builder::{build_simulation, BlockReport, DynSimulation, GridInfo};
pub use error::ConfigError;
pub use precision::Precision;
pub use sim_config::{
    FluidConfig, ForcingConfig, GridConfig, InitConfig, OutputConfig, RunConfig, SimConfig,
    WettingConfig,
};
