// crates/flb_foundation/src/numerics/kahan.rs

//! Kahan 求和算法（泛型版）

use crate::scalar::LatticeScalar;

/// Kahan 求和算法（泛型版）
///
/// 使用 Kahan 算法减少浮点累加误差。薄膜总质量 Σh 的守恒审计依赖
/// 跨数百万格点的稳定求和，朴素累加的误差会淹没真实漂移。
///
/// # 示例
///
/// ```rust
/// use flb_foundation::{numerics::KahanSum, scalar::LatticeScalar};
///
/// fn total_mass<S: LatticeScalar>(height: &[S]) -> S {
///     KahanSum::sum_iter(height.iter().cloned())
/// }
///
/// assert_eq!(total_mass(&[1.0f64, 2.0, 3.0]), 6.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum<S: LatticeScalar> {
    sum: S,
    compensation: S,
}

impl<S: LatticeScalar> KahanSum<S> {
    /// 创建新的求和器
    pub fn new() -> Self {
        Self {
            sum: S::ZERO,
            compensation: S::ZERO,
        }
    }

    /// 添加一个值
    #[inline]
    pub fn add(&mut self, value: S) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// 获取当前求和值
    #[inline]
    pub fn value(&self) -> S {
        self.sum
    }

    /// 重置求和器
    #[inline]
    pub fn reset(&mut self) {
        self.sum = S::ZERO;
        self.compensation = S::ZERO;
    }

    /// 从迭代器求和
    pub fn sum_iter<I: IntoIterator<Item = S>>(iter: I) -> S {
        let mut kahan = Self::new();
        for v in iter {
            kahan.add(v);
        }
        kahan.value()
    }

    /// 对切片求和
    pub fn sum_slice(data: &[S]) -> S {
        Self::sum_iter(data.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kahan_sum_f32() {
        let data = vec![0.1f32; 1000];
        let sum = KahanSum::sum_iter(data.iter().cloned());
        assert!((sum - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_kahan_sum_f64() {
        let data = vec![0.1f64; 1000];
        let sum = KahanSum::sum_iter(data.iter().cloned());
        assert!((sum - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_kahan_beats_naive() {
        // 单精度下大量小值累加，朴素求和误差明显
        let data = vec![1e-4f32; 100_000];
        let naive: f32 = data.iter().sum();
        let kahan = KahanSum::sum_slice(&data);
        assert!((kahan - 10.0).abs() < (naive - 10.0).abs() + 1e-6);
        assert!((kahan - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut k = KahanSum::<f64>::new();
        k.add(5.0);
        assert_eq!(k.value(), 5.0);
        k.reset();
        assert_eq!(k.value(), 0.0);
    }
}
