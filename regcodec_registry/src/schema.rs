//! Registered schema records

use regcodec_schema::{SchemaError, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema format as reported by the registry
///
/// The registry omits `schemaType` for Avro, so it is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    #[default]
    Avro,
    Protobuf,
    Json,
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Avro => write!(f, "AVRO"),
            SchemaType::Protobuf => write!(f, "PROTOBUF"),
            SchemaType::Json => write!(f, "JSON"),
        }
    }
}

/// A schema known to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSchema {
    /// Registry-assigned schema ID
    pub id: u32,
    /// Subject, when looked up through a subject
    pub subject: Option<String>,
    /// Version under the subject, when looked up through a subject
    pub version: Option<u32>,
    /// Schema format
    pub schema_type: SchemaType,
    /// Schema definition text
    pub schema: String,
}

impl RegisteredSchema {
    /// Parse the definition into a type descriptor
    ///
    /// Only protobuf schemas can be described.
    pub fn descriptor(&self) -> Result<TypeDescriptor, SchemaError> {
        match self.schema_type {
            SchemaType::Protobuf => TypeDescriptor::from_proto(&self.schema),
            other => Err(SchemaError::Parse(format!(
                "schema {} has type {}, expected PROTOBUF",
                self.id, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regcodec_schema::{DescriptorBuilder, FieldKind};

    #[test]
    fn test_schema_type_serde() {
        assert_eq!(serde_json::to_string(&SchemaType::Protobuf).unwrap(), "\"PROTOBUF\"");
        let parsed: SchemaType = serde_json::from_str("\"JSON\"").unwrap();
        assert_eq!(parsed, SchemaType::Json);
        assert_eq!(SchemaType::default(), SchemaType::Avro);
    }

    #[test]
    fn test_descriptor_from_protobuf() {
        let descriptor = DescriptorBuilder::new("Order")
            .field(1, "id", FieldKind::Int64)
            .build()
            .unwrap();
        let schema = RegisteredSchema {
            id: 3,
            subject: None,
            version: None,
            schema_type: SchemaType::Protobuf,
            schema: descriptor.to_proto(),
        };
        assert_eq!(schema.descriptor().unwrap(), descriptor);
    }

    #[test]
    fn test_descriptor_rejects_avro() {
        let schema = RegisteredSchema {
            id: 3,
            subject: None,
            version: None,
            schema_type: SchemaType::Avro,
            schema: "{\"type\":\"record\"}".to_string(),
        };
        assert!(schema.descriptor().is_err());
    }
}
