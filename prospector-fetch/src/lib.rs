// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Prospector Fetch
//!
//! The retrying, throttled HTTP layer underneath every source adapter.
//!
//! Responsibilities:
//!
//! - [`Throttle`] - burst pacing within a single session (per-second and
//!   per-minute rolling windows), distinct from the cross-session budget
//!   enforced by `prospector-limiter`
//! - [`RetryStrategy`] / [`retry_request`] - exponential backoff with
//!   jitter on 429s, fixed-attempt retry on transient network failures
//! - [`RateLimitInfo`] - provider rate-limit response header parsing with
//!   an 80% usage warning
//! - [`HttpClient`] - the reqwest wrapper tying the above together, with a
//!   hard per-call timeout so one provider can never block a hunt
//!   indefinitely

pub mod client;
pub mod error;
pub mod rate_info;
pub mod retry;
pub mod throttle;

pub use client::HttpClient;
pub use error::FetchError;
pub use rate_info::{RateInfoCache, RateLimitInfo};
pub use retry::{retry_request, RetryStrategy};
pub use throttle::Throttle;
