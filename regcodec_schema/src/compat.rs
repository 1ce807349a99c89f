//! 读写 schema 兼容性
//!
//! 规则与 protobuf 线上格式一致：两边都存在的字段编号必须类型和
//! repeated 标记完全相同；只在写方存在的字段被跳过，只在读方存在的
//! 字段取默认值。字段名和消息名不参与比较。

use crate::descriptor::TypeDescriptor;
use crate::error::SchemaError;

/// 检查按 `writer` 编码的负载能否按 `reader` 解码
pub fn check_compatible(writer: &TypeDescriptor, reader: &TypeDescriptor) -> Result<(), SchemaError> {
    for field in reader.fields() {
        let Some(written) = writer.field(field.number) else {
            continue;
        };
        if written.kind != field.kind || written.repeated != field.repeated {
            return Err(SchemaError::Incompatible(format!(
                "字段 #{} 写方为 {}{}，读方为 {}{}",
                field.number,
                if written.repeated { "repeated " } else { "" },
                written.kind,
                if field.repeated { "repeated " } else { "" },
                field.kind,
            )));
        }
    }
    Ok(())
}
