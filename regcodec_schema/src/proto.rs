//! proto3 schema 文本
//!
//! 类型描述与 Registry 中保存的 proto3 文本之间的转换。
//! 只处理单个顶层消息、字段均为标量的子集，这也是
//! [`TypeDescriptor::to_proto`] 生成的全部形式。

use crate::descriptor::{DescriptorBuilder, TypeDescriptor};
use crate::error::SchemaError;
use std::fmt::Write;

impl TypeDescriptor {
    /// 生成 proto3 schema 文本
    ///
    /// ```text
    /// syntax = "proto3";
    ///
    /// message Order {
    ///   int64 id = 1;
    ///   string name = 2;
    /// }
    /// ```
    pub fn to_proto(&self) -> String {
        let mut out = String::from("syntax = \"proto3\";\n\n");
        // 写入 String 不会失败
        let _ = writeln!(out, "message {} {{", self.name());
        for field in self.fields() {
            let label = if field.repeated { "repeated " } else { "" };
            let _ = writeln!(
                out,
                "  {}{} {} = {};",
                label,
                field.kind.proto_name(),
                field.name,
                field.number
            );
        }
        out.push_str("}\n");
        out
    }

    /// 解析 proto3 schema 文本
    pub fn from_proto(text: &str) -> Result<TypeDescriptor, SchemaError> {
        let tokens = tokenize(text)?;
        let mut parser = Parser { tokens, pos: 0 };
        parser.file()?.build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Symbol(char),
}

fn tokenize(text: &str) -> Result<Vec<Token>, SchemaError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '/' {
            chars.next();
            match chars.next() {
                Some('/') => {
                    for c in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('*') => {
                    let mut prev = '\0';
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            closed = true;
                            break;
                        }
                        prev = c;
                    }
                    if !closed {
                        return Err(SchemaError::Parse("块注释未闭合".to_string()));
                    }
                }
                _ => return Err(SchemaError::Parse("意外的字符 '/'".to_string())),
            }
        } else if c == '"' || c == '\'' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == c {
                    closed = true;
                    break;
                }
                value.push(next);
            }
            if !closed {
                return Err(SchemaError::Parse("字符串未闭合".to_string()));
            }
            tokens.push(Token::Str(value));
        } else if "{};=<>,[]()".contains(c) {
            chars.next();
            tokens.push(Token::Symbol(c));
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
            let mut word = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' || next == '.' || next == '-' {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(word));
        } else {
            return Err(SchemaError::Parse(format!("意外的字符 {:?}", c)));
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), SchemaError> {
        match self.next() {
            Some(Token::Symbol(c)) if c == symbol => Ok(()),
            other => Err(SchemaError::Parse(format!(
                "期望 '{}'，实际为 {:?}",
                symbol, other
            ))),
        }
    }

    fn expect_ident(&mut self) -> Result<String, SchemaError> {
        match self.next() {
            Some(Token::Ident(word)) => Ok(word),
            other => Err(SchemaError::Parse(format!("期望标识符，实际为 {:?}", other))),
        }
    }

    /// 跳过直到分号（含）
    fn skip_statement(&mut self) -> Result<(), SchemaError> {
        loop {
            match self.next() {
                Some(Token::Symbol(';')) => return Ok(()),
                Some(_) => {}
                None => return Err(SchemaError::Parse("语句缺少 ';'".to_string())),
            }
        }
    }

    fn file(&mut self) -> Result<DescriptorBuilder, SchemaError> {
        let mut message = None;

        while let Some(token) = self.next() {
            let keyword = match token {
                Token::Ident(word) => word,
                Token::Symbol(';') => continue,
                other => {
                    return Err(SchemaError::Parse(format!("意外的记号 {:?}", other)));
                }
            };

            match keyword.as_str() {
                "syntax" => {
                    self.expect_symbol('=')?;
                    match self.next() {
                        Some(Token::Str(version)) if version == "proto3" => {}
                        other => {
                            return Err(SchemaError::Parse(format!(
                                "仅支持 proto3，实际为 {:?}",
                                other
                            )));
                        }
                    }
                    self.expect_symbol(';')?;
                }
                "package" | "option" => self.skip_statement()?,
                "message" => {
                    if message.is_some() {
                        return Err(SchemaError::Parse("只支持单个顶层消息".to_string()));
                    }
                    message = Some(self.message()?);
                }
                other => {
                    return Err(SchemaError::Parse(format!("不支持的声明: {}", other)));
                }
            }
        }

        message.ok_or_else(|| SchemaError::Parse("缺少 message 声明".to_string()))
    }

    fn message(&mut self) -> Result<DescriptorBuilder, SchemaError> {
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;
        let mut builder = DescriptorBuilder::new(name);

        loop {
            let word = match self.next() {
                Some(Token::Symbol('}')) => return Ok(builder),
                Some(Token::Symbol(';')) => continue,
                Some(Token::Ident(word)) => word,
                other => {
                    return Err(SchemaError::Parse(format!("意外的记号 {:?}", other)));
                }
            };

            match word.as_str() {
                "reserved" | "option" => {
                    self.skip_statement()?;
                    continue;
                }
                "message" | "enum" | "oneof" | "map" | "extensions" | "extend" => {
                    return Err(SchemaError::Parse(format!("不支持的消息成员: {}", word)));
                }
                _ => {}
            }

            let (repeated, type_name) = match word.as_str() {
                "repeated" => (true, self.expect_ident()?),
                "optional" => (false, self.expect_ident()?),
                _ => (false, word),
            };
            if matches!(self.peek(), Some(Token::Symbol('<'))) {
                return Err(SchemaError::Parse(format!("不支持的字段类型: {}<...>", type_name)));
            }

            let field_name = self.expect_ident()?;
            self.expect_symbol('=')?;
            let number_text = self.expect_ident()?;
            let number: u32 = number_text
                .parse()
                .map_err(|_| SchemaError::Parse(format!("非法字段编号: {}", number_text)))?;

            // 字段选项 [packed = true] 等不影响结构
            if matches!(self.peek(), Some(Token::Symbol('['))) {
                loop {
                    match self.next() {
                        Some(Token::Symbol(']')) => break,
                        Some(_) => {}
                        None => return Err(SchemaError::Parse("字段选项未闭合".to_string())),
                    }
                }
            }
            self.expect_symbol(';')?;

            let kind = crate::descriptor::FieldKind::from_proto_name(&type_name);
            builder = if repeated {
                builder.repeated(number, field_name, kind)
            } else {
                builder.field(number, field_name, kind)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldKind;

    fn order() -> TypeDescriptor {
        DescriptorBuilder::new("Order")
            .field(1, "id", FieldKind::Int64)
            .field(2, "name", FieldKind::String)
            .repeated(3, "tags", FieldKind::String)
            .build()
            .unwrap()
    }

    #[test]
    fn test_render() {
        let expected = "syntax = \"proto3\";\n\nmessage Order {\n  int64 id = 1;\n  string name = 2;\n  repeated string tags = 3;\n}\n";
        assert_eq!(order().to_proto(), expected);
    }

    #[test]
    fn test_parse_rendered() {
        let descriptor = order();
        assert_eq!(TypeDescriptor::from_proto(&descriptor.to_proto()).unwrap(), descriptor);
    }

    #[test]
    fn test_parse_registry_formatting() {
        let text = r#"
            // normalized by the registry
            syntax = "proto3";
            package shop.events;
            option java_multiple_files = true;

            message Order {
              reserved 4, 5;
              int64 id = 1;
              /* display name */
              optional string name = 2 [json_name = "displayName"];
              repeated sint32 scores = 3 [packed = true];
            }
        "#;
        let descriptor = TypeDescriptor::from_proto(text).unwrap();
        assert_eq!(descriptor.name(), "Order");
        assert_eq!(descriptor.fields().len(), 3);
        assert_eq!(descriptor.field(2).unwrap().name, "name");
        let scores = descriptor.field(3).unwrap();
        assert!(scores.repeated);
        assert_eq!(scores.kind, FieldKind::SInt32);
    }

    #[test]
    fn test_parse_rejects_proto2() {
        let text = "syntax = \"proto2\"; message A { optional int32 a = 1; }";
        assert!(matches!(TypeDescriptor::from_proto(text), Err(SchemaError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_multiple_messages() {
        let text = "syntax = \"proto3\"; message A { int32 a = 1; } message B { int32 b = 1; }";
        assert!(TypeDescriptor::from_proto(text).is_err());
    }

    #[test]
    fn test_parse_rejects_nested_and_map() {
        let nested = "syntax = \"proto3\"; message A { message B { int32 b = 1; } }";
        assert!(TypeDescriptor::from_proto(nested).is_err());

        let map = "syntax = \"proto3\"; message A { map<string, int32> counts = 1; }";
        assert!(TypeDescriptor::from_proto(map).is_err());
    }

    #[test]
    fn test_parse_message_reference_is_unsupported() {
        let text = "syntax = \"proto3\"; message A { Customer customer = 1; }";
        assert!(matches!(
            TypeDescriptor::from_proto(text),
            Err(SchemaError::UnsupportedField { .. })
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(TypeDescriptor::from_proto("").is_err());
        assert!(TypeDescriptor::from_proto("{\"type\": \"record\"}").is_err());
        assert!(TypeDescriptor::from_proto("message A { int32 a = 1 }").is_err());
    }
}
