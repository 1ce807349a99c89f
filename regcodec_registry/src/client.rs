//! Registry client abstraction

use crate::context::RequestContext;
use crate::error::Result;
use crate::schema::RegisteredSchema;
use async_trait::async_trait;
use regcodec_schema::TypeDescriptor;

/// Schema registry operations
///
/// One connection may be shared by many codecs through
/// `Arc<dyn SchemaRegistry>`. Implementations perform no retries.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// Register `descriptor` under `subject` and return its schema ID
    ///
    /// Registering an identical descriptor again returns the existing ID.
    async fn register(
        &self,
        subject: &str,
        descriptor: &TypeDescriptor,
        ctx: &RequestContext,
    ) -> Result<u32>;

    /// Fetch a schema by ID
    async fn fetch_schema(&self, id: u32, ctx: &RequestContext) -> Result<RegisteredSchema>;

    /// Delete every version under `subject`, returning the deleted versions
    async fn delete_subject(&self, subject: &str, ctx: &RequestContext) -> Result<Vec<u32>>;

    /// Latest schema registered under `subject`
    async fn latest_schema(&self, subject: &str, ctx: &RequestContext) -> Result<RegisteredSchema>;

    /// All live subjects
    async fn subjects(&self, ctx: &RequestContext) -> Result<Vec<String>>;
}
