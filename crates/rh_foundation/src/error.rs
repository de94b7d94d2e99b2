// relhydro\crates\rh_foundation\src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 基础层只定义存储与输入相关的核心错误，配置错误在 `rh_config` 中定义，
//! 物理设置错误在 `rh_physics` 中扩展。
//!
//! # 示例
//!
//! ```
//! use rh_foundation::error::{RhError, RhResult};
//!
//! fn check(n: usize) -> RhResult<()> {
//!     if n == 0 {
//!         return Err(RhError::invalid_input("单元数必须为正"));
//!     }
//!     Ok(())
//! }
//! assert!(check(0).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type RhResult<T> = Result<T, RhError>;

/// RelHydro 基础错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RhError {
    /// 数组尺寸不匹配
    #[error("尺寸不匹配: {name} 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 数组名称
        name: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },
}

impl RhError {
    /// 创建无效输入错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    /// 创建尺寸不匹配错误
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { name, expected, actual }
    }
}
