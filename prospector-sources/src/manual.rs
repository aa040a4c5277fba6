//! The sentinel manual source.
//!
//! Manually entered leads come in through the application layer, not
//! through discovery, so the hunt-facing adapter is a no-op: always
//! configured, never makes a network call, always returns an empty
//! terminal page. It exists so a hunt config listing `manual` alongside
//! API sources flows through the same loop without special cases.

use async_trait::async_trait;
use prospector_core::{LeadSource, SearchFilters, SearchPage, SourceError, SourceKind};

/// No-op adapter for [`SourceKind::Manual`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualSource;

#[async_trait]
impl LeadSource for ManualSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Manual
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, _filters: &SearchFilters) -> Result<SearchPage, SourceError> {
        Ok(SearchPage::last(Vec::new()))
    }
}

// ============================================================================
// Tests
// ============================================================================
