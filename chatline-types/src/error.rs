//! Error types for all chatline crates.

use std::time::Duration;

/// Errors from LLM provider operations.
///
/// These cover transport and HTTP-level failures. Content problems inside a
/// successful stream are never errors; see [`StreamIssue`](crate::StreamIssue).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    // Retryable errors
    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Rate limited by the provider.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimit {
        /// Suggested retry delay, if provided by the API.
        retry_after: Option<Duration>,
    },
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Provider service is temporarily unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Terminal errors
    /// Authentication/authorization failure.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Malformed or invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Requested model does not exist.
    #[error("model not found: {0}")]
    ModelNotFound(String),
    /// A successful status carrying an `error` object.
    #[error("upstream error: {0}")]
    Upstream(String),
    /// A successful status whose body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::RateLimit { .. }
                | Self::Timeout(_)
                | Self::ServiceUnavailable(_)
        )
    }
}

/// Errors from conversation store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No conversation with this id.
    #[error("conversation not found: {0}")]
    NotFound(String),
}

/// Errors from driving one chat turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The conversation store rejected the operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// The provider call failed before any response was produced.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}
