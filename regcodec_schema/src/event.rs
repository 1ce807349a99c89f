//! 事件类型
//!
//! 编解码器的类型参数。事件类型自身就是 prost 消息，
//! 同时声明自己的结构描述，供注册和兼容性检查使用。

use crate::descriptor::{DescriptorBuilder, TypeDescriptor};
use regcodec_core::CodecError;

/// 事件类型 trait
///
/// `describe` 返回的字段必须与 prost 派生的字段编号和类型一致。
///
/// ```rust,ignore
/// #[derive(Clone, PartialEq, prost::Message)]
/// struct Order {
///     #[prost(int64, tag = "1")]
///     id: i64,
///     #[prost(string, tag = "2")]
///     name: String,
/// }
///
/// impl EventType for Order {
///     fn describe() -> DescriptorBuilder {
///         DescriptorBuilder::new("Order")
///             .field(1, "id", FieldKind::Int64)
///             .field(2, "name", FieldKind::String)
///     }
/// }
/// ```
pub trait EventType: prost::Message + Default + Send + Sync + 'static {
    /// 声明结构描述
    fn describe() -> DescriptorBuilder;

    /// 用于日志的类型名
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// 业务层面的取值范围校验，编码前调用
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl TypeDescriptor {
    /// 解析事件类型的结构描述
    ///
    /// 同一类型总是得到相同结果；无法描述时返回
    /// [`CodecError::UnsupportedType`]。
    pub fn resolve<E: EventType>() -> Result<TypeDescriptor, CodecError> {
        let builder = E::describe();
        let type_name = builder.name().to_string();
        builder.build().map_err(|e| e.into_unsupported(&type_name))
    }
}
