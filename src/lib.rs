//! # regcodec - 基于 Schema Registry 的强类型事件编解码器
//!
//! regcodec 将强类型事件值编码为单对象信封（魔数 + schema ID + 负载），
//! 并负责事件 schema 在 Registry 中的注册与清理。
//!
//! ## 特性
//!
//! - 从事件类型推导结构描述，注册为 proto3 schema
//! - 5 字节帧头的单对象编码信封，负载使用 Protobuf
//! - 解码时按 schema ID 懒加载写入方 schema，并发未命中只请求一次
//! - 生命周期管理：关闭时删除主题，作用域辅助函数保证清理
//! - Confluent 兼容的 HTTP Registry 客户端与内存 Registry
//!
//! ## 快速开始
//!
//! ```rust,no_run,ignore
//! use regcodec::prelude::*;
//!
//! #[derive(Clone, PartialEq, prost::Message)]
//! struct Order {
//!     #[prost(int64, tag = "1")]
//!     id: i64,
//!     #[prost(string, tag = "2")]
//!     name: String,
//! }
//!
//! impl EventType for Order {
//!     fn describe() -> DescriptorBuilder {
//!         DescriptorBuilder::new("Order")
//!             .field(1, "id", FieldKind::Int64)
//!             .field(2, "name", FieldKind::String)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> regcodec::Result<()> {
//!     let config = RegistryConfig::default().load_with_env_override()?;
//!     let codec = Codec::<Order>::connect(config, "orders-v1").await?;
//!
//!     let bytes = codec.encode(&Order { id: 1, name: "a".into() })?;
//!     let order = codec.decode(&bytes).await?;
//!
//!     codec.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## 模块组织
//!
//! - `regcodec_config` - Registry 连接配置
//! - `regcodec_core` - 错误分类
//! - `regcodec_schema` - 事件类型描述、proto3 文本与兼容性规则
//! - `regcodec_registry` - Registry 客户端
//! - `regcodec_envelope` - 信封格式与类型化编解码

pub mod codec;

pub use crate::codec::{Codec, CodecState, with_codec};

// ============================================================================
// Crate Re-exports
// ============================================================================

pub use regcodec_config;
pub use regcodec_core;
pub use regcodec_envelope;
pub use regcodec_registry;
pub use regcodec_schema;

pub use regcodec_config::{ConfigError, RegistryConfig};
pub use regcodec_core::{CodecError, CodecErrorKind, ErrorContext};
pub use regcodec_envelope::{Envelope, EnvelopeCodec, EnvelopeError};
pub use regcodec_registry::{
    CancellationToken, MemoryRegistry, RegisteredSchema, RegistryError, RequestContext,
    SchemaRegistry, SchemaType,
};
pub use regcodec_schema::{DescriptorBuilder, EventType, FieldKind, TypeDescriptor};

#[cfg(feature = "http")]
pub use regcodec_registry::HttpRegistryClient;

// 派生事件类型需要
pub use prost;

// ============================================================================
// Prelude Module
// ============================================================================

/// 预导出常用类型
///
/// 通过 `use regcodec::prelude::*;` 导入所有常用类型
pub mod prelude {
    pub use crate::codec::{Codec, CodecState, with_codec};
    pub use regcodec_config::RegistryConfig;
    pub use regcodec_core::{CodecError, CodecErrorKind};
    pub use regcodec_registry::{MemoryRegistry, RequestContext, SchemaRegistry};
    pub use regcodec_schema::{DescriptorBuilder, EventType, FieldKind, TypeDescriptor};

    #[cfg(feature = "http")]
    pub use regcodec_registry::HttpRegistryClient;
}

// ============================================================================
// Error Types
// ============================================================================

/// regcodec 统一 Result 类型
pub type Result<T> = std::result::Result<T, Error>;

/// regcodec 统一错误枚举
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 编解码器错误
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registry 错误
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Error {
    /// 编解码器错误类型，其他来源返回 `None`
    pub fn codec_kind(&self) -> Option<CodecErrorKind> {
        match self {
            Error::Codec(err) => Some(err.kind()),
            _ => None,
        }
    }
}

// ============================================================================
// Version Information
// ============================================================================

/// regcodec 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// regcodec 包名
pub const NAME: &str = env!("CARGO_PKG_NAME");
