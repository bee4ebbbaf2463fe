// filmlb\crates\flb_foundation\src/lib.rs

//! FilmLB Foundation Layer
//!
//! 基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型与校验宏
//! - [`scalar`]: 密封标量 trait，支持 f32/f64 精度切换
//! - [`numerics`]: 数值工具（Kahan 求和、整数幂）
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 thiserror、num-traits 与 bytemuck
//! 2. **类型安全**: 标量抽象密封，禁止外部实现
//! 3. **零开销抽象**: release 模式下最小化运行时开销
//!
//! # 示例
//!
//! ```
//! use flb_foundation::{
//!     error::{FlbError, FlbResult},
//!     numerics::int_pow,
//!     scalar::LatticeScalar,
//! };
//!
//! fn relaxation_rate<S: LatticeScalar>(tau: S) -> FlbResult<S> {
//!     if tau <= S::ZERO {
//!         return Err(FlbError::invalid_input("松弛时间必须为正"));
//!     }
//!     Ok(S::ONE - S::ONE / tau)
//! }
//!
//! assert_eq!(relaxation_rate(1.0f64).unwrap(), 0.0);
//! assert_eq!(int_pow(0.5f64, 3), 0.125);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod numerics;
pub mod scalar;

// 重导出常用类型
pub use error::{FlbError, FlbResult};
pub use numerics::{int_pow, KahanSum};
pub use scalar::LatticeScalar;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{FlbError, FlbResult};
    pub use crate::numerics::{int_pow, KahanSum};
    pub use crate::scalar::LatticeScalar;
    pub use crate::{ensure, require};
}
