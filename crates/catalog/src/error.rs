//! Error types for the catalog client.

use thiserror::Error;

/// Errors surfaced by the catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or HTTP-level failure.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when the failure carried one.
        status: Option<u16>,
        message: String,
    },

    /// Upstream throttling (HTTP 429). Retried by [`crate::RetryPolicy`].
    #[error("rate limited by upstream")]
    RateLimited,

    /// Lookup of an id the upstream does not resolve.
    #[error("not found (status {status})")]
    NotFound { status: u16 },

    /// Malformed payload or missing required field.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Retry budget exhausted; `source` is the final throttled failure.
    #[error("gave up after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// The HTTP status associated with this failure, when one was observed.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Transport { status, .. } => *status,
            CatalogError::RateLimited => Some(429),
            CatalogError::NotFound { status } => Some(*status),
            CatalogError::Decode { .. } => None,
            CatalogError::RetriesExhausted { source, .. } => source.status(),
        }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        CatalogError::Transport {
            status: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<SchedulerClosed> for CatalogError {
    fn from(err: SchedulerClosed) -> Self {
        CatalogError::transport(err.to_string())
    }
}

/// The scheduler's drain task is gone, which only happens when the
/// runtime itself is shutting down.
#[derive(Debug, Clone, Copy, Error)]
#[error("request scheduler is shut down")]
pub struct SchedulerClosed;
