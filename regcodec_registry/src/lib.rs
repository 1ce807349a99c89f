//! # regcodec Registry
//!
//! Schema registry client used by regcodec codecs.
//!
//! ## Features
//!
//! - `SchemaRegistry` trait shared by every backend
//! - HTTP client for Confluent-compatible registries (feature `http`)
//! - In-memory registry for local development and tests
//! - Per-call cancellation, deadlines and correlation ids
//!
//! ## Quick Start
//!
//! ```rust,no_run,ignore
//! use regcodec_registry::{HttpRegistryClient, RequestContext, SchemaRegistry};
//! use regcodec_config::RegistryConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpRegistryClient::new(RegistryConfig::new("http://localhost:8081"))?;
//!     let ctx = RequestContext::new().with_correlation_id("req-42");
//!
//!     let schema = client.fetch_schema(1, &ctx).await?;
//!     println!("{}", schema.schema);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod memory;
pub mod schema;

#[cfg(feature = "http")]
pub mod http;

// Re-export main types
pub use crate::client::SchemaRegistry;
pub use crate::context::RequestContext;
pub use crate::error::{RegistryError, Result};
pub use crate::memory::MemoryRegistry;
pub use crate::schema::{RegisteredSchema, SchemaType};

#[cfg(feature = "http")]
pub use crate::http::HttpRegistryClient;

// Cancellation token used by RequestContext
pub use tokio_util::sync::CancellationToken;

// Prelude module for common imports
pub mod prelude {
    pub use crate::client::SchemaRegistry;
    pub use crate::context::RequestContext;
    pub use crate::error::{RegistryError, Result};
    pub use crate::memory::MemoryRegistry;
    pub use crate::schema::{RegisteredSchema, SchemaType};

    #[cfg(feature = "http")]
    pub use crate::http::HttpRegistryClient;
}
