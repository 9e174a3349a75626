// 错误处理系统
// 评分函数要么返回完整结果，要么同步返回错误，不存在部分结果或占位值

use std::io;
use serde::{Serialize, Deserialize};
use thiserror::Error;

// 评分引擎错误类型
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum WineryError {
    // 葡萄园或声望数据缺失 - 调用方应显示"分析不可用"，不得替换为默认值
    #[error("数据缺失: {0}")]
    MissingData(String),

    // 输入无效（面积≤0、贷款期数为0、非有限数值等）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    // 配置错误（范围表 min > max、配置文件解析失败等）
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("文件错误: {0}")]
    FileError(String),

    #[error("解析错误: {0}")]
    ParseError(String),
}

// Result类型别名
pub type Result<T> = std::result::Result<T, WineryError>;

// 错误转换实现
impl From<io::Error> for WineryError {
    fn from(error: io::Error) -> Self {
        WineryError::FileError(error.to_string())
    }
}

impl From<serde_json::Error> for WineryError {
    fn from(error: serde_json::Error) -> Self {
        WineryError::ParseError(error.to_string())
    }
}

impl From<toml::de::Error> for WineryError {
    fn from(error: toml::de::Error) -> Self {
        WineryError::ConfigError(error.to_string())
    }
}

impl From<toml::ser::Error> for WineryError {
    fn from(error: toml::ser::Error) -> Self {
        WineryError::ConfigError(error.to_string())
    }
}

// 错误创建辅助宏
#[macro_export]
macro_rules! winery_error {
    ($variant:ident, $msg:expr) => {
        $crate::core::error::WineryError::$variant($msg.to_string())
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::core::error::WineryError::$variant(format!($fmt, $($arg)*))
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl WineryError {
    // 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WineryError::MissingData(_) => ErrorSeverity::High,
            WineryError::ConfigError(_) => ErrorSeverity::High,
            WineryError::InvalidInput(_) => ErrorSeverity::Low,
            _ => ErrorSeverity::Medium,
        }
    }

    // 纯函数重试没有意义：相同输入必然得到相同错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, WineryError::FileError(_))
    }
}

// 校验数值为有限数
pub fn ensure_finite(value: f64, name: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WineryError::InvalidInput(format!("{} 不是有限数值: {}", name, value)))
    }
}
