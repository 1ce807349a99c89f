//! 订单事件示例
//!
//! 演示编解码器的完整生命周期：注册、编码、解码、关闭。
//! 设置 `REGCODEC_REGISTRY_URL` 时连接真实 Registry，否则使用内存 Registry。

use regcodec::prelude::*;
use std::sync::Arc;

#[derive(Clone, PartialEq, prost::Message)]
struct Order {
    #[prost(int64, tag = "1")]
    id: i64,
    #[prost(string, tag = "2")]
    name: String,
}

impl EventType for Order {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Order")
            .field(1, "id", FieldKind::Int64)
            .field(2, "name", FieldKind::String)
    }
}

#[tokio::main]
async fn main() -> regcodec::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("regcodec=debug,regcodec_registry=debug")
        .init();

    println!("=== regcodec 订单示例 ===\n");

    let registry: Arc<dyn SchemaRegistry> = if std::env::var("REGCODEC_REGISTRY_URL").is_ok() {
        let config = RegistryConfig::default().load_with_env_override()?;
        println!("{}\n", config.summary());
        Arc::new(HttpRegistryClient::new(config)?)
    } else {
        println!("未设置 REGCODEC_REGISTRY_URL，使用内存 Registry\n");
        Arc::new(MemoryRegistry::new())
    };

    // 1. 注册
    let codec = Codec::<Order>::new(registry, "orders-v1").await?;
    println!("1. 已注册主题 {}，schema ID = {}", codec.subject(), codec.schema_id());

    // 2. 编码
    let order = Order {
        id: 1,
        name: "a".to_string(),
    };
    let bytes = codec.encode(&order)?;
    println!("2. 编码结果 {} 字节: {:02x?}", bytes.len(), &bytes[..]);

    // 3. 解码
    let decoded = codec.decode(&bytes).await?;
    println!("3. 解码结果: id={}, name={}", decoded.id, decoded.name);

    // 4. 关闭并删除主题
    codec.close().await?;
    println!("4. 已关闭，状态 = {}", codec.state());

    Ok(())
}
