//! regcodec 核心集成测试
//!
//! 测试错误分类在上下文包装和错误链中的行为。

// 错误分类集成测试
#[cfg(test)]
mod error_tests {
    use regcodec_core::prelude::*;
    use std::error::Error as _;

    #[test]
    fn test_nested_context_keeps_kind() {
        let err = CodecError::decode("payload truncated")
            .with_context(ErrorContext::schema_id(7))
            .with_context(ErrorContext::subject("orders-v1"));

        assert_eq!(err.kind(), CodecErrorKind::Decode);
        assert!(err.is_per_call());

        let text = err.to_string();
        assert!(text.contains("schema_id: 7"));
        assert!(text.contains("subject: orders-v1"));
    }

    #[test]
    fn test_context_exposes_source() {
        let err = CodecError::cleanup("orders-v1", "503").with_context("closing codec");
        let source = err.source().expect("context wraps a source");
        assert_eq!(source.to_string(), "清理主题 orders-v1 失败: 503");
    }

    #[test]
    fn test_fatal_errors_are_not_per_call() {
        let fatal = [
            CodecError::unsupported_type("Basket", "map field"),
            CodecError::registration("orders-v1", "unauthorized"),
            CodecError::cleanup("orders-v1", "timeout"),
            CodecError::ClosedCodec,
            CodecError::config("bad url"),
        ];
        for err in fatal {
            assert!(!err.is_per_call(), "{:?}", err.kind());
        }
    }

    #[test]
    fn test_result_alias() {
        fn fails() -> Result<u32> {
            Err(CodecError::UnknownSchema(42))
        }
        assert_eq!(fails().unwrap_err().kind(), CodecErrorKind::UnknownSchema);
    }
}
