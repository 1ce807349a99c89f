//! regcodec 信封编解码
//!
//! 定义单对象编码信封的线上格式，并提供绑定 schema 的类型化编解码器。

pub mod cache;
pub mod codec;
pub mod envelope;

// 导出主要类型到 crate root
pub use crate::cache::SchemaCache;
pub use crate::codec::EnvelopeCodec;
pub use crate::envelope::{Envelope, EnvelopeError};
// 重新导出 regcodec_core 的错误类型
pub use regcodec_core::{CodecError, Result};

// 预导出
pub mod prelude {
    pub use crate::codec::EnvelopeCodec;
    pub use crate::envelope::{Envelope, EnvelopeError};
    pub use regcodec_core::{CodecError, Result};
}
