//! Fetch error types.

use prospector_core::SourceError;
use thiserror::Error;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limited by the provider and retries exhausted.
    #[error("Rate limited on {endpoint}, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, from the Retry-After header
        /// or the computed backoff.
        retry_after: Option<u64>,
        /// Endpoint that reported the limit.
        endpoint: String,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from the provider.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] prospector_core::CoreError),
}

impl FetchError {
    /// Returns true for failures worth retrying on the same endpoint
    /// without treating them as evidence of rate limiting.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout(_) => true,
            FetchError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited {
                retry_after,
                endpoint,
            } => SourceError::RateLimited {
                retry_after,
                endpoint,
            },
            FetchError::Timeout(secs) => SourceError::Timeout(secs),
            FetchError::AuthenticationFailed(msg) => SourceError::AuthenticationFailed(msg),
            FetchError::InvalidResponse(msg) => SourceError::InvalidResponse(msg),
            other => SourceError::Other(other.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
