//! 并发与 schema 演进集成测试

mod common;

use common::{Order, order};
use futures_util::future::join_all;
use regcodec::prelude::*;
use regcodec::Envelope;
use std::sync::Arc;

#[derive(Clone, PartialEq, prost::Message)]
struct OrderV2 {
    #[prost(int64, tag = "1")]
    id: i64,
    #[prost(string, tag = "2")]
    name: String,
    #[prost(string, tag = "3")]
    note: String,
}

impl EventType for OrderV2 {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Order")
            .field(1, "id", FieldKind::Int64)
            .field(2, "name", FieldKind::String)
            .field(3, "note", FieldKind::String)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_encode() {
    let registry: Arc<dyn SchemaRegistry> = Arc::new(MemoryRegistry::new());
    let codec = Arc::new(Codec::<Order>::new(registry, "orders-v1").await.unwrap());

    let tasks = (0..64i64).map(|i| {
        let codec = codec.clone();
        tokio::spawn(async move {
            let value = order(i, &format!("order-{}", i));
            let bytes = codec.encode(&value).unwrap();
            (value, bytes)
        })
    });

    for result in join_all(tasks).await {
        let (value, bytes) = result.unwrap();
        assert!(bytes.len() >= Envelope::HEADER_SIZE);
        assert_eq!(bytes[0], Envelope::MAGIC_BYTE);
        assert_eq!(Envelope::peek_schema_id(&bytes).unwrap(), codec.schema_id());
        assert_eq!(codec.decode(&bytes).await.unwrap(), value);
    }

    codec.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_decode_of_evolved_writer() {
    let registry: Arc<dyn SchemaRegistry> = Arc::new(MemoryRegistry::new());
    let reader = Arc::new(Codec::<Order>::new(registry.clone(), "orders-v1").await.unwrap());
    let writer = Codec::<OrderV2>::new(registry.clone(), "orders-v2").await.unwrap();
    assert_ne!(reader.schema_id(), writer.schema_id());

    let bytes = writer
        .encode(&OrderV2 {
            id: 9,
            name: "evolved".to_string(),
            note: "ignored by reader".to_string(),
        })
        .unwrap();

    let tasks = (0..32).map(|_| {
        let reader = reader.clone();
        let bytes = bytes.clone();
        tokio::spawn(async move { reader.decode(&bytes).await })
    });
    for result in join_all(tasks).await {
        assert_eq!(result.unwrap().unwrap(), order(9, "evolved"));
    }

    writer.close().await.unwrap();
    reader.close().await.unwrap();
}

#[tokio::test]
async fn test_reader_field_defaults() {
    let registry: Arc<dyn SchemaRegistry> = Arc::new(MemoryRegistry::new());
    let writer = Codec::<Order>::new(registry.clone(), "orders-v1").await.unwrap();
    let reader = Codec::<OrderV2>::new(registry.clone(), "orders-v2").await.unwrap();

    let bytes = writer.encode(&order(4, "old")).unwrap();
    let decoded = reader.decode(&bytes).await.unwrap();
    assert_eq!(decoded.id, 4);
    assert_eq!(decoded.name, "old");
    assert!(decoded.note.is_empty());

    writer.close().await.unwrap();
    reader.close().await.unwrap();
}

#[tokio::test]
async fn test_unknown_schema_keeps_codec_usable() {
    let registry: Arc<dyn SchemaRegistry> = Arc::new(MemoryRegistry::new());
    let codec = Codec::<Order>::new(registry, "orders-v1").await.unwrap();

    let mut bytes = codec.encode(&order(1, "a")).unwrap().to_vec();
    bytes[1..5].copy_from_slice(&u32::MAX.to_be_bytes());
    let err = codec.decode(&bytes).await.unwrap_err();
    assert_eq!(err.kind(), CodecErrorKind::UnknownSchema);
    assert!(err.is_per_call());

    let bytes = codec.encode(&order(2, "b")).unwrap();
    assert_eq!(codec.decode(&bytes).await.unwrap(), order(2, "b"));
    codec.close().await.unwrap();
}
