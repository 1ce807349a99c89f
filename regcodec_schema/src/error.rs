//! schema 错误

use regcodec_core::CodecError;
use thiserror::Error;

/// 类型描述、schema 解析与兼容性检查错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// 非法的消息名或字段名
    #[error("非法标识符: {0:?}")]
    InvalidName(String),

    /// 字段编号重复
    #[error("字段编号重复: {0}")]
    DuplicateFieldNumber(u32),

    /// 字段名重复
    #[error("字段名重复: {0}")]
    DuplicateFieldName(String),

    /// 字段编号超出范围
    #[error("字段编号超出范围: {0}")]
    FieldNumberOutOfRange(u32),

    /// 字段编号落在保留区间
    #[error("字段编号位于保留区间: {0}")]
    ReservedFieldNumber(u32),

    /// 字段类型无法在单消息 schema 中表达
    #[error("字段 {field} 的类型 {kind} 不受支持")]
    UnsupportedField { field: String, kind: String },

    /// schema 文本解析失败
    #[error("schema 解析失败: {0}")]
    Parse(String),

    /// 读写 schema 不兼容
    #[error("schema 不兼容: {0}")]
    Incompatible(String),
}

impl SchemaError {
    /// 转换为构造期的不支持类型错误
    pub fn into_unsupported(self, type_name: &str) -> CodecError {
        CodecError::unsupported_type(type_name, self.to_string())
    }

    /// 转换为解码错误
    pub fn into_decode(self) -> CodecError {
        CodecError::decode(self.to_string())
    }
}
