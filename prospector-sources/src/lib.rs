// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Prospector Sources
//!
//! Concrete adapters for every supported lead discovery source.
//!
//! Each source contributes a [`SourceDescriptor`]: the static configuration
//! (auth style, endpoint, burst caps, default budget) plus function pointers
//! that build the provider query and parse the provider response. The shared
//! [`ApiLeadSource`] adapter drives any descriptor through the HTTP layer,
//! so per-source modules stay declarative.
//!
//! The [`SourceRegistry`] gives static access to all descriptors, and
//! [`build_sources`] turns a `HuntConfig` into ready-to-call
//! `LeadSource` trait objects, rejecting sources with unusable credentials
//! before the hunt loop ever sees them.

pub mod adapter;
pub mod apollo;
pub mod clearbit;
pub mod descriptor;
pub mod factory;
pub mod hunter;
pub mod manual;
pub mod registry;
pub mod snov;

pub use adapter::ApiLeadSource;
pub use descriptor::{AuthStyle, BurstCaps, SearchPlan, SourceDescriptor};
pub use factory::{build_sources, BuiltSources};
pub use manual::ManualSource;
pub use registry::SourceRegistry;
