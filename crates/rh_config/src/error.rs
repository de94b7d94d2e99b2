// relhydro\crates\rh_config\src/error.rs

//! 配置层错误类型
//!
//! 所有配置错误都是致命错误，必须在第一个时间步之前报告。

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 未知名称
    #[error("未知的{kind}名称: '{name}'")]
    UnknownName {
        /// 类别（状态方程、重构、求解器……）
        kind: &'static str,
        /// 输入的名称
        name: String,
    },

    /// 不兼容的组合
    #[error("不兼容的配置组合: {0}")]
    Incompatible(String),

    /// 缺失配置
    #[error("缺失配置: {0}")]
    Missing(String),

    /// 构建错误
    #[error("构建错误: {0}")]
    Build(String),
}

impl ConfigError {
    /// 创建无效值错误
    pub fn invalid(key: &str, value: impl ToString, reason: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
