//! Source registry for managing all source descriptors.
//!
//! The registry provides static access to every API-backed source
//! configuration and is the central lookup point for the factory and the
//! CLI. The sentinel manual source has no descriptor: it never touches the
//! network, so the factory wires it directly.

use prospector_core::{SourceKind, SourceLimits};
use std::sync::OnceLock;

use crate::apollo::apollo_descriptor;
use crate::clearbit::clearbit_descriptor;
use crate::descriptor::SourceDescriptor;
use crate::hunter::hunter_descriptor;
use crate::snov::snov_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all source descriptors.
static DESCRIPTORS: OnceLock<Vec<SourceDescriptor>> = OnceLock::new();

/// Initializes all source descriptors, in default priority order.
fn init_descriptors() -> Vec<SourceDescriptor> {
    vec![
        hunter_descriptor(),
        apollo_descriptor(),
        snov_descriptor(),
        clearbit_descriptor(),
    ]
}

// ============================================================================
// Source Registry
// ============================================================================

/// Global registry of all source descriptors.
///
/// Initialized lazily on first access; descriptors are static data, so
/// shared references are handed out freely.
pub struct SourceRegistry;

impl SourceRegistry {
    /// Returns all source descriptors.
    pub fn all() -> &'static [SourceDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a source descriptor by kind.
    ///
    /// Returns `None` for [`SourceKind::Manual`], which has no descriptor.
    pub fn get(id: SourceKind) -> Option<&'static SourceDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Looks up a source descriptor by CLI name.
    pub fn get_by_cli_name(name: &str) -> Option<&'static SourceDescriptor> {
        let kind = SourceKind::from_cli_name(name)?;
        Self::get(kind)
    }

    /// Default budget for a source, manual included.
    pub fn default_limits(id: SourceKind) -> SourceLimits {
        match Self::get(id) {
            Some(desc) => desc.limits(),
            // Manual entry costs nothing
            None => SourceLimits::unlimited(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_api_source_has_a_descriptor() {
        for kind in SourceKind::all() {
            if kind.is_manual() {
                assert!(SourceRegistry::get(*kind).is_none());
            } else {
                let desc = SourceRegistry::get(*kind).unwrap();
                assert_eq!(desc.id, *kind);
                assert!(!desc.search.endpoint.is_empty());
                assert!(desc.search.base_url.starts_with("https://"));
            }
        }
    }

    #[test]
    fn test_lookup_by_cli_name() {
        let desc = SourceRegistry::get_by_cli_name("hunter").unwrap();
        assert_eq!(desc.id, SourceKind::Hunter);
        assert!(SourceRegistry::get_by_cli_name("nonsense").is_none());
    }

    #[test]
    fn test_endpoint_labels_are_unique() {
        let mut labels: Vec<_> = SourceRegistry::all()
            .iter()
            .map(|d| d.search.endpoint)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), SourceRegistry::all().len());
    }

    #[test]
    fn test_manual_default_limits_are_unlimited() {
        let limits = SourceRegistry::default_limits(SourceKind::Manual);
        assert_eq!(limits.monthly_requests, u32::MAX);
    }
}
