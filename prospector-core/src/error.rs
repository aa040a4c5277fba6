//! Core error types for Prospector.

use thiserror::Error;

/// Core error type for Prospector operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Source not found or not configured.
    #[error("Source not configured: {0}")]
    SourceNotConfigured(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Error type for a single provider search call.
///
/// The orchestrator matches on [`SourceError::RateLimited`] to drive its
/// per-source backoff; every other variant retires the source for the
/// remainder of the hunt.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The provider signalled rate limiting and retries were exhausted.
    #[error("Rate limit exceeded on {endpoint}, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before the source is worth retrying.
        retry_after: Option<u64>,
        /// The endpoint that reported the limit.
        endpoint: String,
    },

    /// The request timed out after exhausting retries.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Authentication failed (bad or expired credentials).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider returned a response we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic source failure.
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// Returns true if this error is the distinguished rate-limit failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SourceError::RateLimited { .. })
    }
}
