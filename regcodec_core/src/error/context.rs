//! 错误上下文
//!
//! 为编解码错误附加主题、schema ID 等定位信息。

use std::fmt;

/// 错误上下文信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// 键值对上下文
    KeyValue(String, String),
    /// 自定义上下文
    Custom(String),
}

impl ErrorContext {
    /// 主题上下文
    pub fn subject(subject: impl Into<String>) -> Self {
        ErrorContext::KeyValue("subject".to_string(), subject.into())
    }

    /// schema ID 上下文
    pub fn schema_id(id: u32) -> Self {
        ErrorContext::KeyValue("schema_id".to_string(), id.to_string())
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorContext::KeyValue(key, value) => write!(f, "{}: {}", key, value),
            ErrorContext::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<(&str, String)> for ErrorContext {
    fn from((key, value): (&str, String)) -> Self {
        ErrorContext::KeyValue(key.to_string(), value)
    }
}

impl From<(&str, &str)> for ErrorContext {
    fn from((key, value): (&str, &str)) -> Self {
        ErrorContext::KeyValue(key.to_string(), value.to_string())
    }
}

impl From<String> for ErrorContext {
    fn from(msg: String) -> Self {
        ErrorContext::Custom(msg)
    }
}

impl From<&str> for ErrorContext {
    fn from(msg: &str) -> Self {
        ErrorContext::Custom(msg.to_string())
    }
}
