// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Prospector Hunt
//!
//! The top-level driver for one discovery session.
//!
//! A hunt loops over its configured sources one call at a time: the
//! [`SourceSelector`] picks the next source the budget allows, the rate
//! limiter consumes a slot, the source executes one query page, and new
//! unique leads are merged into the result set. Progress streams out over
//! a channel after every iteration, and the caller can cancel between any
//! two suspension points via a [`CancellationToken`].
//!
//! Hunts never fail as a whole. Individual sources may error, hit rate
//! limits, or be skipped for missing credentials, and all of that is
//! reported per source in the final [`HuntResult`].
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken
//! [`HuntResult`]: prospector_core::HuntResult

pub mod orchestrator;
pub mod selector;

pub use orchestrator::HuntOrchestrator;
pub use selector::SourceSelector;
