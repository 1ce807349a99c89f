//! regcodec 类型描述
//!
//! 从事件类型推导结构描述，生成并解析 proto3 schema 文本，
//! 以及判断读写 schema 的兼容性。

pub mod compat;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod proto;

pub use crate::compat::check_compatible;
pub use crate::descriptor::{DescriptorBuilder, FieldDescriptor, FieldKind, TypeDescriptor};
pub use crate::error::SchemaError;
pub use crate::event::EventType;

// 预导出
pub mod prelude {
    pub use crate::descriptor::{DescriptorBuilder, FieldKind, TypeDescriptor};
    pub use crate::event::EventType;
}
