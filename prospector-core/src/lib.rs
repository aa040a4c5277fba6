// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Prospector Core
//!
//! Core types, models, and traits for the Prospector lead discovery
//! orchestrator.
//!
//! This crate provides the foundational abstractions used across all other
//! Prospector crates, including:
//!
//! - Domain models (sources, limits, usage records, leads, hunts)
//! - Error types
//! - The [`LeadSource`] trait that concrete provider adapters implement
//!
//! ## Key Types
//!
//! ### Source Types
//! - [`SourceKind`] - Closed enum of all supported discovery sources
//! - [`SourceCredentials`] - Per-source API credentials
//! - [`SourceLimits`] - Per-source rate-limit configuration
//!
//! ### Usage Types
//! - [`UsageRecord`] - Mutable per-source request/credit bookkeeping
//! - [`RateLimitStatus`] - Derived, read-only snapshot of a source's budget
//!
//! ### Hunt Types
//! - [`HuntConfig`] - Parameters for one discovery session
//! - [`Lead`] - One discovered, source-qualified result
//! - [`HuntProgress`] / [`HuntResult`] - In-flight and final hunt views

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{CoreError, SourceError};

// Re-export all model types
pub use models::{
    // Hunt types
    HuntConfig,
    HuntProgress,
    HuntResult,
    HuntState,
    // Lead types
    Lead,
    // Usage types
    RateLimitStatus,
    SearchFilters,
    // Source types
    SourceCredentials,
    SourceKind,
    SourceLimits,
    SourceStats,
    UsageRecord,
};

// Re-export traits
pub use traits::{LeadSource, SearchPage, SourceRateLimit};
