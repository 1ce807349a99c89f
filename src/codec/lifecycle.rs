//! Codec lifecycle manager
//!
//! Resolves the event type, registers it under a subject, serves
//! encode/decode while ready, and deletes the subject on close.

use super::state::{AtomicState, CodecState};
use bytes::Bytes;
use regcodec_core::{CodecError, Result};
use regcodec_envelope::EnvelopeCodec;
use regcodec_registry::{RequestContext, SchemaRegistry};
use regcodec_schema::{EventType, TypeDescriptor};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "http")]
use regcodec_config::RegistryConfig;
#[cfg(feature = "http")]
use regcodec_registry::HttpRegistryClient;

/// Registry-backed codec for one event type
///
/// Construction registers the schema; [`close`](Codec::close) deletes the
/// subject exactly once. Encode and decode only work in between. The codec
/// is `Send + Sync`, so share it through an `Arc` for concurrent use.
///
/// # Example
///
/// ```rust,no_run,ignore
/// use regcodec::prelude::*;
/// use std::sync::Arc;
///
/// let registry: Arc<dyn SchemaRegistry> = Arc::new(MemoryRegistry::new());
/// let codec = Codec::<Order>::new(registry, "orders-v1").await?;
///
/// let bytes = codec.encode(&order)?;
/// let decoded = codec.decode(&bytes).await?;
///
/// codec.close().await?;
/// ```
pub struct Codec<E> {
    subject: String,
    registry: Arc<dyn SchemaRegistry>,
    inner: EnvelopeCodec<E>,
    state: AtomicState,
}

impl<E: EventType> Codec<E> {
    /// Resolve `E`, register it under `subject` and bind the codec
    pub async fn new(registry: Arc<dyn SchemaRegistry>, subject: impl Into<String>) -> Result<Self> {
        Self::new_with(registry, subject, &RequestContext::new()).await
    }

    /// Like [`new`](Codec::new), with a caller-supplied deadline,
    /// cancellation token and correlation id
    ///
    /// On failure nothing is bound and there is nothing to clean up.
    pub async fn new_with(
        registry: Arc<dyn SchemaRegistry>,
        subject: impl Into<String>,
        ctx: &RequestContext,
    ) -> Result<Self> {
        let subject = subject.into();

        let descriptor = TypeDescriptor::resolve::<E>()?;
        tracing::debug!(
            subject = %subject,
            state = %CodecState::Registering,
            event_type = E::type_name(),
            correlation_id = ctx.correlation_id(),
            "registering schema"
        );

        // Another codec may already own this subject; closing either one deletes it for both
        if let Ok(live) = registry.latest_schema(&subject, ctx).await {
            tracing::warn!(
                subject = %subject,
                schema_id = live.id,
                version = ?live.version,
                "subject already registered, binding shares it with its current owner"
            );
        }

        let schema_id = registry
            .register(&subject, &descriptor, ctx)
            .await
            .map_err(|e| e.into_registration(&subject))?;

        let inner = EnvelopeCodec::new(schema_id, Arc::new(descriptor), registry.clone());
        let state = AtomicState::new(CodecState::Ready);
        tracing::info!(subject = %subject, schema_id, "codec ready");

        Ok(Self {
            subject,
            registry,
            inner,
            state,
        })
    }

    /// Build an HTTP registry client from `config` and bind the codec
    #[cfg(feature = "http")]
    pub async fn connect(config: RegistryConfig, subject: impl Into<String>) -> Result<Self> {
        let client =
            HttpRegistryClient::new(config).map_err(|e| CodecError::config(e.to_string()))?;
        Self::new(Arc::new(client), subject).await
    }

    /// Encode `value` into an envelope
    pub fn encode(&self, value: &E) -> Result<Bytes> {
        self.ensure_ready()?;
        self.inner.encode(value)
    }

    /// Decode an envelope into `E`
    pub async fn decode(&self, data: &[u8]) -> Result<E> {
        self.decode_with(data, &RequestContext::new()).await
    }

    /// Decode an envelope, using `ctx` if the writer schema must be fetched
    pub async fn decode_with(&self, data: &[u8], ctx: &RequestContext) -> Result<E> {
        self.ensure_ready()?;
        self.inner.decode_with(data, ctx).await
    }
}

impl<E> Codec<E> {
    /// Delete the subject and close the codec
    ///
    /// Returns [`CodecError::ClosedCodec`] if already closed and
    /// [`CodecError::Cleanup`] if the deletion failed. Either way the codec
    /// stays closed and the deletion is never retried.
    pub async fn close(&self) -> Result<()> {
        self.close_with(&RequestContext::new()).await
    }

    /// Like [`close`](Codec::close), under a caller-supplied context
    pub async fn close_with(&self, ctx: &RequestContext) -> Result<()> {
        if !self.state.transition(CodecState::Ready, CodecState::Closed) {
            return Err(CodecError::ClosedCodec);
        }

        let versions = self
            .registry
            .delete_subject(&self.subject, ctx)
            .await
            .map_err(|e| e.into_cleanup(&self.subject))?;

        tracing::info!(
            subject = %self.subject,
            schema_id = self.inner.schema_id(),
            versions = versions.len(),
            correlation_id = ctx.correlation_id(),
            "codec closed"
        );
        Ok(())
    }

    /// Schema ID returned by the registry
    pub fn schema_id(&self) -> u32 {
        self.inner.schema_id()
    }

    /// Registered subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Current lifecycle state
    pub fn state(&self) -> CodecState {
        self.state.load()
    }

    /// Resolved descriptor of the event type
    pub fn descriptor(&self) -> &TypeDescriptor {
        self.inner.descriptor()
    }

    /// Registry this codec is bound to
    pub fn registry(&self) -> &Arc<dyn SchemaRegistry> {
        &self.registry
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state.load() {
            CodecState::Ready => Ok(()),
            _ => Err(CodecError::ClosedCodec),
        }
    }
}

impl<E> Drop for Codec<E> {
    fn drop(&mut self) {
        if !self.state.transition(CodecState::Ready, CodecState::Closed) {
            return;
        }

        let subject = std::mem::take(&mut self.subject);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    subject = %subject,
                    schema_id = self.inner.schema_id(),
                    "codec dropped without close, deleting subject in background"
                );
                let registry = self.registry.clone();
                handle.spawn(async move {
                    if let Err(e) = registry.delete_subject(&subject, &RequestContext::new()).await {
                        tracing::warn!(subject = %subject, error = %e, "background subject deletion failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(
                    subject = %subject,
                    schema_id = self.inner.schema_id(),
                    "codec dropped without close outside a runtime, subject left registered"
                );
            }
        }
    }
}

impl<E> fmt::Debug for Codec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("subject", &self.subject)
            .field("schema_id", &self.inner.schema_id())
            .field("state", &self.state.load())
            .finish_non_exhaustive()
    }
}
