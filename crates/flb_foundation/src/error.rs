// filmlb\crates\flb_foundation\src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `FlbError` 枚举和 `FlbResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，物理相关错误在 flb_physics 中定义
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **快速失败**: 配置类错误在进入时间步循环之前抛出
//!
//! # 示例
//!
//! ```
//! use flb_foundation::error::{FlbError, FlbResult};
//!
//! fn read_config() -> FlbResult<()> {
//!     Err(FlbError::config("配置文件格式错误"))
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type FlbResult<T> = Result<T, FlbError>;

/// FilmLB 错误类型
///
/// 核心错误类型，用于整个项目。物理计算相关的错误应在 `flb_physics` 中扩展。
#[derive(Error, Debug)]
pub enum FlbError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    // ========================================================================
    // 输入与配置错误
    // ========================================================================

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    // ========================================================================
    // 数值错误
    // ========================================================================

    /// 出现非有限值（NaN 或 Inf）
    #[error("非有限数值: {field} 在索引 {index} 处为 {value}")]
    NonFinite {
        /// 字段名
        field: &'static str,
        /// 出错位置（展平索引）
        index: usize,
        /// 实际值
        value: f64,
    },

    /// 数值发散
    #[error("数值发散: {message}")]
    Divergence {
        /// 发散描述（如质量漂移超限）
        message: String,
    },

    /// 验证失败
    #[error("验证失败: {0}")]
    Validation(String),

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl FlbError {
    /// 从IO错误创建
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 非有限数值
    pub fn non_finite(field: &'static str, index: usize, value: f64) -> Self {
        Self::NonFinite {
            field,
            index,
            value,
        }
    }

    /// 数值发散
    pub fn divergence(message: impl Into<String>) -> Self {
        Self::Divergence {
            message: message.into(),
        }
    }

    /// 验证失败
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl FlbError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> FlbResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> FlbResult<()> {
        if value < min || value > max {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查值是否严格为正
    #[inline]
    pub fn check_positive(field: &'static str, value: f64) -> FlbResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::out_of_range(field, value, f64::MIN_POSITIVE, f64::MAX))
        }
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for FlbError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 校验宏
// ========================================================================

/// 条件校验宏：条件不满足时提前返回错误
///
/// # 示例
///
/// ```
/// use flb_foundation::{ensure, error::{FlbError, FlbResult}};
///
/// fn check(value: i32) -> FlbResult<()> {
///     ensure!(value > 0, FlbError::invalid_input("value must be positive"));
///     Ok(())
/// }
///
/// assert!(check(1).is_ok());
/// assert!(check(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

/// Option 解包宏：`None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr) => {
        match $opt {
            Some(v) => v,
            None => return Err($err.into()),
        }
    };
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlbError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_io_error() {
        let err = FlbError::io("读取失败");
        assert!(err.to_string().contains("IO错误"));
    }

    #[test]
    fn test_out_of_range() {
        let err = FlbError::out_of_range("tau", 0.0, 0.5, 2.0);
        assert!(err.to_string().contains("tau"));
        assert!(err.to_string().contains("0.5"));
    }

    #[test]
    fn test_non_finite() {
        let err = FlbError::non_finite("height", 42, f64::NAN);
        assert!(err.to_string().contains("height"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_check_size() {
        assert!(FlbError::check_size("test", 10, 10).is_ok());
        assert!(FlbError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(FlbError::check_range("value", 5.0, 0.0, 10.0).is_ok());
        assert!(FlbError::check_range("value", -1.0, 0.0, 10.0).is_err());
        assert!(FlbError::check_range("value", 11.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_check_positive() {
        assert!(FlbError::check_positive("h_min", 0.1).is_ok());
        assert!(FlbError::check_positive("h_min", 0.0).is_err());
        assert!(FlbError::check_positive("h_min", -0.1).is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let flb_err: FlbError = io_err.into();
        assert!(matches!(flb_err, FlbError::Io { .. }));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> FlbResult<()> {
            ensure!(value > 0, FlbError::invalid_input("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> FlbResult<i32> {
            let v = require!(opt, FlbError::invalid_input("missing value"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
