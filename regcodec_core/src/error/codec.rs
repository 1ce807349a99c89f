//! 编解码器错误类型
//!
//! 覆盖类型描述、主题注册、信封编解码和主题清理全过程的错误分类。

use super::context::ErrorContext;
use thiserror::Error;

/// 编解码器错误
#[derive(Error, Debug)]
pub enum CodecError {
    /// 事件类型无法用 schema 描述（构造期致命错误）
    #[error("不支持的事件类型 {type_name}: {reason}")]
    UnsupportedType { type_name: String, reason: String },

    /// 向 Registry 注册 schema 失败（构造期致命错误）
    #[error("注册主题 {subject} 失败: {reason}")]
    Registration { subject: String, reason: String },

    /// 信封引用了 Registry 中不存在的 schema ID
    #[error("未知的 schema ID: {0}")]
    UnknownSchema(u32),

    /// 值不符合 schema，无法编码
    #[error("编码失败: {0}")]
    Encode(String),

    /// 信封格式错误或负载与 schema 不匹配
    #[error("解码失败: {0}")]
    Decode(String),

    /// 删除主题失败，不影响此前已成功的编解码结果
    #[error("清理主题 {subject} 失败: {reason}")]
    Cleanup { subject: String, reason: String },

    /// 编解码器关闭后继续使用
    #[error("编解码器已关闭")]
    ClosedCodec,

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 带上下文的错误
    #[error("{0} ({1})")]
    WithContext(#[source] Box<CodecError>, ErrorContext),
}

impl CodecError {
    /// 获取错误类型，上下文包装会被穿透
    pub fn kind(&self) -> CodecErrorKind {
        match self {
            CodecError::UnsupportedType { .. } => CodecErrorKind::UnsupportedType,
            CodecError::Registration { .. } => CodecErrorKind::Registration,
            CodecError::UnknownSchema(_) => CodecErrorKind::UnknownSchema,
            CodecError::Encode(_) => CodecErrorKind::Encode,
            CodecError::Decode(_) => CodecErrorKind::Decode,
            CodecError::Cleanup { .. } => CodecErrorKind::Cleanup,
            CodecError::ClosedCodec => CodecErrorKind::ClosedCodec,
            CodecError::Config(_) => CodecErrorKind::Config,
            CodecError::WithContext(inner, _) => inner.kind(),
        }
    }

    /// 添加上下文信息
    pub fn with_context<C>(self, context: C) -> Self
    where
        C: Into<ErrorContext>,
    {
        CodecError::WithContext(Box::new(self), context.into())
    }

    /// 错误是否只影响当前这一次调用
    ///
    /// 编码、解码和未知 schema 错误之后编解码器仍然可用。
    pub fn is_per_call(&self) -> bool {
        matches!(
            self.kind(),
            CodecErrorKind::Encode | CodecErrorKind::Decode | CodecErrorKind::UnknownSchema
        )
    }

    /// 创建不支持类型错误
    pub fn unsupported_type(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::UnsupportedType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// 创建注册错误
    pub fn registration(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Registration {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// 创建编码错误
    pub fn encode(msg: impl Into<String>) -> Self {
        CodecError::Encode(msg.into())
    }

    /// 创建解码错误
    pub fn decode(msg: impl Into<String>) -> Self {
        CodecError::Decode(msg.into())
    }

    /// 创建清理错误
    pub fn cleanup(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Cleanup {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        CodecError::Config(msg.into())
    }
}

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecErrorKind {
    /// 不支持的事件类型
    UnsupportedType,
    /// 注册失败
    Registration,
    /// 未知 schema
    UnknownSchema,
    /// 编码失败
    Encode,
    /// 解码失败
    Decode,
    /// 清理失败
    Cleanup,
    /// 使用已关闭的编解码器
    ClosedCodec,
    /// 配置错误
    Config,
}
