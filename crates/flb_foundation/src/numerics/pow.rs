// crates/flb_foundation/src/numerics/pow.rs

//! 整数幂（连乘实现）
//!
//! 分离压力的幂律项 `(hmin/(h+hcrit))^n` 中 n、m 为小正整数，
//! 使用连乘而非通用 `powf`，保证逐位可复现并避免超越函数开销。

use crate::scalar::LatticeScalar;

/// 整数幂，按连乘顺序展开
///
/// `int_pow(b, 0) == 1`，负底数按乘法符号规则处理。
///
/// # 示例
///
/// ```
/// use flb_foundation::numerics::int_pow;
///
/// assert_eq!(int_pow(2.0f64, 10), 1024.0);
/// assert_eq!(int_pow(0.5f32, 2), 0.25);
/// assert_eq!(int_pow(3.0f64, 0), 1.0);
/// ```
#[inline]
pub fn int_pow<S: LatticeScalar>(base: S, exp: u32) -> S {
    let mut acc = S::ONE;
    for _ in 0..exp {
        acc *= base;
    }
    acc
}
