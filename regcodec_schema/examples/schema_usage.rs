//! 类型描述示例
//!
//! 演示如何为事件类型声明结构描述并生成 proto3 schema。

use regcodec_schema::{DescriptorBuilder, EventType, FieldKind, TypeDescriptor, check_compatible};

#[derive(Clone, PartialEq, prost::Message)]
struct OrderPlaced {
    #[prost(int64, tag = "1")]
    id: i64,
    #[prost(string, tag = "2")]
    name: String,
    #[prost(uint32, tag = "3")]
    quantity: u32,
}

impl EventType for OrderPlaced {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("OrderPlaced")
            .field(1, "id", FieldKind::Int64)
            .field(2, "name", FieldKind::String)
            .field(3, "quantity", FieldKind::UInt32)
    }

    fn validate(&self) -> Result<(), String> {
        if self.quantity == 0 {
            return Err("quantity 必须大于 0".to_string());
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== regcodec 类型描述示例 ===\n");

    // 示例 1: 解析类型描述
    println!("1. 解析类型描述:");
    let descriptor = TypeDescriptor::resolve::<OrderPlaced>()?;
    println!("   ✓ {} 共 {} 个字段", descriptor.name(), descriptor.fields().len());
    println!();

    // 示例 2: 生成 proto3 schema
    println!("2. 生成 proto3 schema:");
    let text = descriptor.to_proto();
    println!("{}", text);

    // 示例 3: 解析回类型描述
    println!("3. 解析 schema 文本:");
    let parsed = TypeDescriptor::from_proto(&text)?;
    println!("   ✓ 解析结果与原描述一致: {}", parsed == descriptor);
    println!();

    // 示例 4: 兼容性检查
    println!("4. 兼容性检查:");
    let older = DescriptorBuilder::new("OrderPlaced")
        .field(1, "id", FieldKind::Int64)
        .build()?;
    match check_compatible(&older, &descriptor) {
        Ok(()) => println!("   ✓ 旧版本负载可按新版本解码"),
        Err(e) => println!("   ✗ {}", e),
    }

    Ok(())
}
