//! 类型描述
//!
//! 将事件类型的字段映射为 schema 字段定义。描述一旦构建完成即不可变，
//! 编码和解码路径共享同一份实例。

use crate::error::SchemaError;
use std::fmt;

/// Protobuf 允许的最大字段编号
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Protobuf 实现保留的字段编号区间
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// 字段类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
    /// 引用其它消息类型，单消息 schema 无法表达
    Message(String),
    /// map 字段，单消息 schema 无法表达
    Map(Box<FieldKind>, Box<FieldKind>),
}

impl FieldKind {
    /// 标量类型在 proto3 中的名称
    pub fn proto_name(&self) -> String {
        match self {
            FieldKind::Double => "double".to_string(),
            FieldKind::Float => "float".to_string(),
            FieldKind::Int32 => "int32".to_string(),
            FieldKind::Int64 => "int64".to_string(),
            FieldKind::UInt32 => "uint32".to_string(),
            FieldKind::UInt64 => "uint64".to_string(),
            FieldKind::SInt32 => "sint32".to_string(),
            FieldKind::SInt64 => "sint64".to_string(),
            FieldKind::Fixed32 => "fixed32".to_string(),
            FieldKind::Fixed64 => "fixed64".to_string(),
            FieldKind::SFixed32 => "sfixed32".to_string(),
            FieldKind::SFixed64 => "sfixed64".to_string(),
            FieldKind::Bool => "bool".to_string(),
            FieldKind::String => "string".to_string(),
            FieldKind::Bytes => "bytes".to_string(),
            FieldKind::Message(name) => name.clone(),
            FieldKind::Map(key, value) => {
                format!("map<{}, {}>", key.proto_name(), value.proto_name())
            }
        }
    }

    /// 从 proto3 类型名解析，非标量名称视为消息引用
    pub fn from_proto_name(name: &str) -> Self {
        match name {
            "double" => FieldKind::Double,
            "float" => FieldKind::Float,
            "int32" => FieldKind::Int32,
            "int64" => FieldKind::Int64,
            "uint32" => FieldKind::UInt32,
            "uint64" => FieldKind::UInt64,
            "sint32" => FieldKind::SInt32,
            "sint64" => FieldKind::SInt64,
            "fixed32" => FieldKind::Fixed32,
            "fixed64" => FieldKind::Fixed64,
            "sfixed32" => FieldKind::SFixed32,
            "sfixed64" => FieldKind::SFixed64,
            "bool" => FieldKind::Bool,
            "string" => FieldKind::String,
            "bytes" => FieldKind::Bytes,
            other => FieldKind::Message(other.to_string()),
        }
    }

    /// 是否为单消息 schema 可表达的标量
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldKind::Message(_) | FieldKind::Map(_, _))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.proto_name())
    }
}

/// 字段定义
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// 字段编号（线上标识）
    pub number: u32,
    /// 字段名
    pub name: String,
    /// 字段类型
    pub kind: FieldKind,
    /// 是否为 repeated 字段
    pub repeated: bool,
}

/// 类型描述
///
/// 字段始终按编号升序排列，同一类型总是得到相同的描述。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// 消息名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 所有字段（按编号升序）
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// 按编号查找字段
    pub fn field(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields
            .binary_search_by_key(&number, |f| f.number)
            .ok()
            .map(|idx| &self.fields[idx])
    }

    /// 按名称查找字段
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// 类型描述构建器
///
/// 事件类型通过 [`crate::EventType::describe`] 返回构建器，
/// 由 [`DescriptorBuilder::build`] 统一校验。
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl DescriptorBuilder {
    /// 创建指定消息名的构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// 消息名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 添加单值字段
    pub fn field(self, number: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(number, name.into(), kind, false)
    }

    /// 添加 repeated 字段
    pub fn repeated(self, number: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(number, name.into(), kind, true)
    }

    fn push(mut self, number: u32, name: String, kind: FieldKind, repeated: bool) -> Self {
        self.fields.push(FieldDescriptor {
            number,
            name,
            kind,
            repeated,
        });
        self
    }

    /// 校验并生成类型描述
    pub fn build(self) -> Result<TypeDescriptor, SchemaError> {
        if !is_identifier(&self.name) {
            return Err(SchemaError::InvalidName(self.name));
        }

        let mut fields = self.fields;
        fields.sort_by_key(|f| f.number);

        for (idx, field) in fields.iter().enumerate() {
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidName(field.name.clone()));
            }
            if field.number == 0 || field.number > MAX_FIELD_NUMBER {
                return Err(SchemaError::FieldNumberOutOfRange(field.number));
            }
            if RESERVED_FIELD_NUMBERS.contains(&field.number) {
                return Err(SchemaError::ReservedFieldNumber(field.number));
            }
            if !field.kind.is_scalar() {
                return Err(SchemaError::UnsupportedField {
                    field: field.name.clone(),
                    kind: field.kind.proto_name(),
                });
            }
            // 已排序，重复编号必然相邻
            if idx > 0 && fields[idx - 1].number == field.number {
                return Err(SchemaError::DuplicateFieldNumber(field.number));
            }
            if fields[..idx].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateFieldName(field.name.clone()));
            }
        }

        Ok(TypeDescriptor {
            name: self.name,
            fields,
        })
    }
}

/// proto 标识符：字母或下划线开头，其后为字母、数字或下划线
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> DescriptorBuilder {
        DescriptorBuilder::new("Order")
            .field(2, "name", FieldKind::String)
            .field(1, "id", FieldKind::Int64)
    }

    #[test]
    fn test_build_sorts_fields() {
        let descriptor = order().build().unwrap();
        assert_eq!(descriptor.name(), "Order");
        let numbers: Vec<u32> = descriptor.fields().iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(descriptor.field(2).unwrap().name, "name");
        assert_eq!(descriptor.field_by_name("id").unwrap().kind, FieldKind::Int64);
        assert!(descriptor.field(3).is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(order().build().unwrap(), order().build().unwrap());
    }

    #[test]
    fn test_empty_message_is_valid() {
        let descriptor = DescriptorBuilder::new("Ping").build().unwrap();
        assert!(descriptor.fields().is_empty());
    }

    #[test]
    fn test_duplicate_number() {
        let result = order().field(1, "other", FieldKind::Bool).build();
        assert_eq!(result, Err(SchemaError::DuplicateFieldNumber(1)));
    }

    #[test]
    fn test_duplicate_name() {
        let result = order().field(3, "id", FieldKind::Bool).build();
        assert_eq!(result, Err(SchemaError::DuplicateFieldName("id".to_string())));
    }

    #[test]
    fn test_field_number_range() {
        let zero = order().field(0, "zero", FieldKind::Bool).build();
        assert_eq!(zero, Err(SchemaError::FieldNumberOutOfRange(0)));

        let huge = order().field(MAX_FIELD_NUMBER + 1, "huge", FieldKind::Bool).build();
        assert_eq!(huge, Err(SchemaError::FieldNumberOutOfRange(MAX_FIELD_NUMBER + 1)));

        let reserved = order().field(19_500, "reserved", FieldKind::Bool).build();
        assert_eq!(reserved, Err(SchemaError::ReservedFieldNumber(19_500)));
    }

    #[test]
    fn test_unsupported_kinds() {
        let nested = order()
            .field(3, "customer", FieldKind::Message("Customer".to_string()))
            .build();
        assert!(matches!(nested, Err(SchemaError::UnsupportedField { .. })));

        let map = order()
            .field(
                3,
                "tags",
                FieldKind::Map(Box::new(FieldKind::String), Box::new(FieldKind::String)),
            )
            .build();
        match map {
            Err(SchemaError::UnsupportedField { field, kind }) => {
                assert_eq!(field, "tags");
                assert_eq!(kind, "map<string, string>");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_names() {
        assert!(DescriptorBuilder::new("1Order").build().is_err());
        assert!(DescriptorBuilder::new("").build().is_err());
        assert!(order().field(3, "bad-name", FieldKind::Bool).build().is_err());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [FieldKind::SFixed64, FieldKind::Bytes, FieldKind::UInt32] {
            assert_eq!(FieldKind::from_proto_name(&kind.proto_name()), kind);
        }
        assert_eq!(
            FieldKind::from_proto_name("Customer"),
            FieldKind::Message("Customer".to_string())
        );
    }
}
