//! Source factory.
//!
//! Turns a hunt config into ready-to-call [`LeadSource`] trait objects.
//! Sources without usable credentials are rejected here, before the hunt
//! loop starts, so a misconfigured source is a per-source fast failure
//! rather than a mid-hunt surprise.

use prospector_core::{HuntConfig, LeadSource, SourceCredentials, SourceKind};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapter::ApiLeadSource;
use crate::descriptor::SourceDescriptor;
use crate::manual::ManualSource;
use crate::registry::SourceRegistry;

// ============================================================================
// Built Sources
// ============================================================================

/// Outcome of building a hunt's sources.
pub struct BuiltSources {
    /// Usable sources, in the config's preferred order.
    pub sources: Vec<Arc<dyn LeadSource>>,
    /// Sources rejected at construction, with the reason.
    pub rejected: Vec<(SourceKind, String)>,
}

impl BuiltSources {
    /// The kinds of the usable sources, in order.
    pub fn kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Builds the sources for one hunt.
///
/// Credentials come from the config first, then from the descriptor's
/// environment variables. Duplicate entries in the config's source list
/// are collapsed to the first occurrence.
pub fn build_sources(config: &HuntConfig) -> BuiltSources {
    let mut sources: Vec<Arc<dyn LeadSource>> = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for &kind in &config.sources {
        if !seen.insert(kind) {
            continue;
        }

        if kind.is_manual() {
            sources.push(Arc::new(ManualSource));
            continue;
        }

        let Some(descriptor) = SourceRegistry::get(kind) else {
            rejected.push((kind, "no descriptor registered".to_string()));
            continue;
        };

        let Some(credentials) = resolve_credentials(config, descriptor) else {
            warn!(
                source = %kind,
                env = descriptor.api_key_env,
                "Source has no usable credentials, skipping"
            );
            rejected.push((kind, "missing or empty API key".to_string()));
            continue;
        };

        match ApiLeadSource::new(descriptor, credentials) {
            Ok(adapter) => {
                debug!(source = %kind, "Source ready");
                sources.push(Arc::new(adapter));
            }
            Err(e) => {
                warn!(source = %kind, error = %e, "Failed to build source adapter");
                rejected.push((kind, e.to_string()));
            }
        }
    }

    BuiltSources { sources, rejected }
}

/// Config credentials first, environment fallback second.
fn resolve_credentials(
    config: &HuntConfig,
    descriptor: &SourceDescriptor,
) -> Option<SourceCredentials> {
    if let Some(creds) = config.credentials.get(&descriptor.id) {
        return creds.is_usable().then(|| creds.clone());
    }

    let api_key = std::env::var(descriptor.api_key_env).ok()?;
    let creds = SourceCredentials {
        api_key,
        api_secret: descriptor
            .api_secret_env
            .and_then(|env| std::env::var(env).ok()),
    };
    creds.is_usable().then_some(creds)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use prospector_core::SearchFilters;

    fn config_for(sources: Vec<SourceKind>) -> HuntConfig {
        HuntConfig::new(SearchFilters::for_domain("example.com"), sources)
    }

    #[test]
    fn test_missing_credentials_reject_the_source() {
        let config = config_for(vec![SourceKind::Hunter])
            .with_credentials(SourceKind::Hunter, SourceCredentials::new("  "));

        let built = build_sources(&config);
        assert!(built.sources.is_empty());
        assert_eq!(built.rejected.len(), 1);
        assert_eq!(built.rejected[0].0, SourceKind::Hunter);
    }

    #[test]
    fn test_configured_sources_keep_order() {
        let config = config_for(vec![
            SourceKind::Apollo,
            SourceKind::Hunter,
            SourceKind::Manual,
        ])
        .with_credentials(SourceKind::Apollo, SourceCredentials::new("key-a"))
        .with_credentials(SourceKind::Hunter, SourceCredentials::new("key-h"));

        let built = build_sources(&config);
        assert!(built.rejected.is_empty());
        assert_eq!(
            built.kinds(),
            vec![SourceKind::Apollo, SourceKind::Hunter, SourceKind::Manual]
        );
    }

    #[test]
    fn test_duplicate_sources_collapse_to_first() {
        let config = config_for(vec![SourceKind::Manual, SourceKind::Manual]);
        let built = build_sources(&config);
        assert_eq!(built.sources.len(), 1);
    }

    #[test]
    fn test_manual_needs_no_credentials() {
        let built = build_sources(&config_for(vec![SourceKind::Manual]));
        assert_eq!(built.kinds(), vec![SourceKind::Manual]);
        assert!(built.rejected.is_empty());
    }
}
