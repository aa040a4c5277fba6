//! Limiter error types.

use thiserror::Error;

/// Error type for limiter persistence operations.
#[derive(Debug, Error)]
pub enum LimiterError {
    /// IO error reading or writing state.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// State serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
