//! regcodec 核心类型
//!
//! 提供编解码器错误分类和各 crate 共享的基础定义。

pub mod error;

// 导出主要类型到 crate root
pub use crate::error::{CodecError, CodecErrorKind, ErrorContext, Result};

// 预导出
pub mod prelude {
    pub use crate::error::{CodecError, CodecErrorKind, ErrorContext, Result};
}
