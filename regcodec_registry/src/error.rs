//! Registry client error types

use regcodec_config::ConfigError;
use regcodec_core::CodecError;
use thiserror::Error;

/// Registry client errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Network or protocol failure talking to the registry
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Schema rejected by the subject's compatibility rules
    #[error("Incompatible schema for subject {subject}: {message}")]
    Incompatible { subject: String, message: String },

    /// Schema text rejected by the registry
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Subject has no versions
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    /// No schema with this ID
    #[error("Schema not found: {0}")]
    SchemaNotFound(u32),

    /// Registry answered with an unexpected error status
    #[error("Registry error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Deadline elapsed
    #[error("Request timed out")]
    Timeout,

    /// Caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RegistryError {
    /// Map a failed `register` call
    pub fn into_registration(self, subject: &str) -> CodecError {
        CodecError::registration(subject, self.to_string())
    }

    /// Map a failed `fetch_schema` call made while decoding
    pub fn into_fetch(self, schema_id: u32) -> CodecError {
        match self {
            RegistryError::SchemaNotFound(_) => CodecError::UnknownSchema(schema_id),
            other => CodecError::decode(format!("fetching schema {}: {}", schema_id, other)),
        }
    }

    /// Map a failed `delete_subject` call
    pub fn into_cleanup(self, subject: &str) -> CodecError {
        CodecError::cleanup(subject, self.to_string())
    }
}

impl From<ConfigError> for RegistryError {
    fn from(err: ConfigError) -> Self {
        RegistryError::InvalidConfig(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RegistryError::Timeout
        } else if err.is_decode() {
            RegistryError::InvalidResponse(err.to_string())
        } else {
            RegistryError::Transport(err.to_string())
        }
    }
}

/// Registry result type
pub type Result<T> = std::result::Result<T, RegistryError>;
