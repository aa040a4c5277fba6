// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Prospector Limiter
//!
//! Per-source usage tracking and rate limiting.
//!
//! Two layers:
//!
//! - [`UsageTracker`] - pure sliding-window and budget arithmetic, no I/O,
//!   no locks. All methods take an explicit `now` so the logic is fully
//!   deterministic under test.
//! - [`RateLimiter`] - the shared async wrapper: atomic check-then-consume
//!   under a mutex, best-source ranking, availability polling, and state
//!   export/import for persistence across restarts.
//!
//! The limiter is constructed explicitly and passed into the orchestrator;
//! there is no module-level singleton. Multiple hunts may share one
//! `Arc<RateLimiter>` when they target the same provider credentials.

pub mod error;
pub mod limiter;
pub mod persistence;
pub mod tracker;

pub use error::LimiterError;
pub use limiter::RateLimiter;
pub use persistence::{default_state_path, load_state, save_state};
pub use tracker::UsageTracker;
