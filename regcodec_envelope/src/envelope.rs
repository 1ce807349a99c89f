//! 信封
//!
//! 定义单条事件在线上的二进制格式。

use bytes::{BufMut, BytesMut};
use regcodec_core::CodecError;
use std::fmt;
use thiserror::Error;

/// 信封
///
/// ```text
/// +-------+-----------+----------+
/// | Magic | Schema ID | Payload  |
/// | 1 byte| 4 bytes BE| variable |
/// +-------+-----------+----------+
/// ```
///
/// 解析结果借用输入，负载不拷贝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Registry 分配的 schema ID
    pub schema_id: u32,
    /// 按 schema 序列化的负载
    pub payload: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// 单对象编码的魔数
    pub const MAGIC_BYTE: u8 = 0x00;

    /// 帧头大小（魔数 + schema ID）
    pub const HEADER_SIZE: usize = 1 + 4;

    /// 最大负载大小（16MB）
    pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

    /// 写入帧头，负载由调用方随后追加
    pub fn write_header(schema_id: u32, buf: &mut BytesMut) {
        buf.put_u8(Self::MAGIC_BYTE);
        buf.put_u32(schema_id);
    }

    /// 解析信封，校验帧头和负载大小
    pub fn parse(data: &'a [u8]) -> Result<Self, EnvelopeError> {
        let schema_id = Self::peek_schema_id(data)?;
        let payload = &data[Self::HEADER_SIZE..];
        if payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(EnvelopeError::PayloadTooLarge(payload.len()));
        }
        Ok(Self { schema_id, payload })
    }

    /// 只校验帧头并读取 schema ID
    pub fn peek_schema_id(data: &[u8]) -> Result<u32, EnvelopeError> {
        if data.len() < Self::HEADER_SIZE {
            return Err(EnvelopeError::TooShort(data.len()));
        }
        if data[0] != Self::MAGIC_BYTE {
            return Err(EnvelopeError::BadMagic(data[0]));
        }
        Ok(u32::from_be_bytes([data[1], data[2], data[3], data[4]]))
    }

    /// 完整信封大小
    pub fn len(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len()
    }

    /// 负载是否为空
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl fmt::Display for Envelope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envelope[schema_id={}, payload_len={}]",
            self.schema_id,
            self.payload.len()
        )
    }
}

/// 信封错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// 数据不足一个帧头
    #[error("信封长度不足: {0} 字节")]
    TooShort(usize),
    /// 魔数不匹配
    #[error("无效的魔数: {0:#04x}")]
    BadMagic(u8),
    /// 负载过大
    #[error("负载过大: {0} 字节")]
    PayloadTooLarge(usize),
}

impl From<EnvelopeError> for CodecError {
    fn from(err: EnvelopeError) -> Self {
        CodecError::decode(err.to_string())
    }
}
