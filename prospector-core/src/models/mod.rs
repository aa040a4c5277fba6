//! Domain models for Prospector.
//!
//! This module contains the core data structures representing discovery
//! sources, rate-limit bookkeeping, leads, and hunt sessions.
//!
//! ## Submodules
//!
//! - [`source`] - Source types (`SourceKind`, `SourceCredentials`)
//! - [`limits`] - Rate-limit types (`SourceLimits`, `UsageRecord`, `RateLimitStatus`)
//! - [`lead`] - Lead types (`Lead`, `SearchFilters`)
//! - [`hunt`] - Hunt session types (`HuntConfig`, `HuntProgress`, `HuntResult`)

mod hunt;
mod lead;
mod limits;
mod source;

// Re-export everything at the models level
pub use hunt::{HuntConfig, HuntProgress, HuntResult, HuntState, SourceStats};
pub use lead::{Lead, SearchFilters};
pub use limits::{RateLimitStatus, SourceLimits, UsageRecord};
pub use source::{SourceCredentials, SourceKind};
