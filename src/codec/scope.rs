//! Scoped codec acquisition

use super::lifecycle::Codec;
use regcodec_core::{CodecErrorKind, Result};
use regcodec_registry::SchemaRegistry;
use regcodec_schema::EventType;
use std::future::Future;
use std::sync::Arc;

/// Run `body` with a freshly registered codec and always close it afterwards
///
/// The subject is deleted whether `body` succeeds or fails. A body error
/// wins over a cleanup error; the cleanup failure is attached to it as
/// context. If `body` closed the codec itself, the scope treats it as
/// already torn down and returns the body's result unchanged. If `body`
/// panics, the codec's drop handler schedules the deletion instead.
///
/// # Example
///
/// ```rust,no_run,ignore
/// let decoded = with_codec(registry, "orders-v1", |codec: Arc<Codec<Order>>| async move {
///     let bytes = codec.encode(&order)?;
///     codec.decode(&bytes).await
/// })
/// .await?;
/// ```
pub async fn with_codec<E, F, Fut, T>(
    registry: Arc<dyn SchemaRegistry>,
    subject: impl Into<String>,
    body: F,
) -> Result<T>
where
    E: EventType,
    F: FnOnce(Arc<Codec<E>>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let codec = Arc::new(Codec::<E>::new(registry, subject).await?);
    let outcome = body(codec.clone()).await;
    let closed = match codec.close().await {
        Err(err) if err.kind() == CodecErrorKind::ClosedCodec => Ok(()),
        other => other,
    };

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(cleanup)) => Err(cleanup),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup)) => Err(err.with_context(("cleanup", cleanup.to_string()))),
    }
}
