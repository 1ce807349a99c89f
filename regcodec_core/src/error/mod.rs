//! regcodec 统一错误处理
//!
//! 提供编解码器级别的错误类型定义和上下文机制。

pub mod codec;
pub mod context;

// 重新导出主要类型
pub use codec::{CodecError, CodecErrorKind};
pub use context::ErrorContext;

/// regcodec 统一 Result 类型
pub type Result<T> = std::result::Result<T, CodecError>;
