//! 类型化编解码器
//!
//! 将事件值编码为信封，并把信封解码回事件值。

use crate::cache::SchemaCache;
use crate::envelope::Envelope;
use bytes::{Buf, Bytes, BytesMut};
use prost::Message;
use prost::encoding::{DecodeContext, WireType};
use regcodec_core::{CodecError, ErrorContext, Result};
use regcodec_registry::{RequestContext, SchemaRegistry};
use regcodec_schema::{EventType, FieldKind, TypeDescriptor, check_compatible};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 信封编解码器
///
/// 绑定一个 schema ID，只读持有 Registry 句柄，从不修改 Registry。
pub struct EnvelopeCodec<E> {
    schema_id: u32,
    descriptor: Arc<TypeDescriptor>,
    registry: Arc<dyn SchemaRegistry>,
    cache: SchemaCache,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EventType> EnvelopeCodec<E> {
    /// 创建绑定到 `schema_id` 的编解码器
    pub fn new(
        schema_id: u32,
        descriptor: Arc<TypeDescriptor>,
        registry: Arc<dyn SchemaRegistry>,
    ) -> Self {
        Self {
            schema_id,
            descriptor,
            registry,
            cache: SchemaCache::new(),
            _marker: PhantomData,
        }
    }

    /// 编码事件值
    ///
    /// 负载中出现结构描述未声明的字段，或线上类型与声明不符时，
    /// 返回 [`CodecError::Encode`]，不会产出与注册 schema 不一致的信封。
    pub fn encode(&self, value: &E) -> Result<Bytes> {
        value.validate().map_err(CodecError::encode)?;

        let len = value.encoded_len();
        if len > Envelope::MAX_PAYLOAD_SIZE {
            return Err(CodecError::encode(format!("负载过大: {} 字节", len)));
        }

        let mut buf = BytesMut::with_capacity(Envelope::HEADER_SIZE + len);
        Envelope::write_header(self.schema_id, &mut buf);
        value
            .encode(&mut buf)
            .map_err(|e| CodecError::encode(e.to_string()))?;
        check_payload(&self.descriptor, &buf[Envelope::HEADER_SIZE..])?;
        Ok(buf.freeze())
    }

    /// 解码信封
    pub async fn decode(&self, data: &[u8]) -> Result<E> {
        self.decode_with(data, &RequestContext::new()).await
    }

    /// 解码信封，写入方 schema 需要获取时使用给定的请求上下文
    pub async fn decode_with(&self, data: &[u8], ctx: &RequestContext) -> Result<E> {
        let Envelope { schema_id, payload } = Envelope::parse(data)?;

        if schema_id != self.schema_id {
            let writer = self
                .cache
                .get_or_fetch(schema_id, self.registry.as_ref(), ctx)
                .await?;
            check_compatible(&writer, &self.descriptor)
                .map_err(|e| e.into_decode().with_context(ErrorContext::schema_id(schema_id)))?;
        }

        decode_payload(payload)
    }

    /// 只解码绑定 schema 的信封，不访问 Registry
    pub fn decode_bound(&self, data: &[u8]) -> Result<E> {
        let envelope = Envelope::parse(data)?;
        if envelope.schema_id != self.schema_id {
            return Err(CodecError::decode(format!(
                "schema ID {} 与绑定的 {} 不一致",
                envelope.schema_id, self.schema_id
            )));
        }
        decode_payload(envelope.payload)
    }
}

impl<E> EnvelopeCodec<E> {
    /// 绑定的 schema ID
    pub fn schema_id(&self) -> u32 {
        self.schema_id
    }

    /// 读取方结构描述
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// 写入方 schema 缓存
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }
}

/// 核对负载中的每个字段都在结构描述中声明且线上类型一致
fn check_payload(descriptor: &TypeDescriptor, mut payload: &[u8]) -> Result<()> {
    while payload.has_remaining() {
        let (number, wire_type) = prost::encoding::decode_key(&mut payload)
            .map_err(|e| CodecError::encode(e.to_string()))?;
        let Some(field) = descriptor.field(number) else {
            return Err(CodecError::encode(format!(
                "字段 #{} 未在 {} 的结构描述中声明",
                number,
                descriptor.name()
            )));
        };
        if !wire_type_matches(&field.kind, field.repeated, wire_type) {
            return Err(CodecError::encode(format!(
                "字段 #{} {} 声明为 {}，负载线上类型为 {:?}",
                number, field.name, field.kind, wire_type
            )));
        }
        prost::encoding::skip_field(wire_type, number, &mut payload, DecodeContext::default())
            .map_err(|e| CodecError::encode(e.to_string()))?;
    }
    Ok(())
}

fn wire_type_matches(kind: &FieldKind, repeated: bool, wire_type: WireType) -> bool {
    let expected = match kind {
        FieldKind::Int32
        | FieldKind::Int64
        | FieldKind::UInt32
        | FieldKind::UInt64
        | FieldKind::SInt32
        | FieldKind::SInt64
        | FieldKind::Bool => WireType::Varint,
        FieldKind::Double | FieldKind::Fixed64 | FieldKind::SFixed64 => WireType::SixtyFourBit,
        FieldKind::Float | FieldKind::Fixed32 | FieldKind::SFixed32 => WireType::ThirtyTwoBit,
        FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) | FieldKind::Map(..) => {
            WireType::LengthDelimited
        }
    };
    // packed repeated 标量以长度分隔方式写出
    wire_type == expected || (repeated && wire_type == WireType::LengthDelimited)
}

fn decode_payload<E: EventType>(payload: &[u8]) -> Result<E> {
    E::decode(payload).map_err(|e| CodecError::decode(e.to_string()))
}

impl<E> fmt::Debug for EnvelopeCodec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeCodec")
            .field("schema_id", &self.schema_id)
            .field("descriptor", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}
