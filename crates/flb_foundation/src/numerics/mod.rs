// crates/flb_foundation/src/numerics/mod.rs

//! 数值工具模块
//!
//! - [`kahan`]: Kahan 补偿求和，用于质量审计
//! - [`pow`]: 整数幂（连乘实现），用于分离压力的幂律项

pub mod kahan;
pub mod pow;

pub use kahan::KahanSum;
pub use pow::int_pow;
