//! Per-call request context
//!
//! Carries the caller's cancellation token, an optional deadline and an
//! optional correlation id through every registry call.

use crate::error::{RegistryError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Request context
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
    correlation_id: Option<String>,
}

impl RequestContext {
    /// Context that never cancels and has no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fail calls that have not completed within `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fail calls that have not completed by `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a correlation id for tracing
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Correlation id, if any
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Cancellation token
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the caller already cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run `fut` under this context
    ///
    /// Returns [`RegistryError::Cancelled`] when the token fires first and
    /// [`RegistryError::Timeout`] when the deadline passes first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(RegistryError::Cancelled);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(RegistryError::Timeout),
                },
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RegistryError::Cancelled),
            result = bounded => result,
        }
    }
}
