//! Trait definitions for Prospector.
//!
//! This module defines the pluggable boundary that concrete source
//! adapters implement against each provider's real HTTP API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::models::{Lead, SearchFilters, SourceKind};

// ============================================================================
// Search Page
// ============================================================================

/// One page of results from a source.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Leads on this page (not yet deduplicated).
    pub leads: Vec<Lead>,
    /// Total results the provider claims to have, if reported.
    pub total: Option<u64>,
    /// Whether more pages are available.
    pub has_more: bool,
}

impl SearchPage {
    /// Creates a terminal page with the given leads.
    pub fn last(leads: Vec<Lead>) -> Self {
        Self {
            leads,
            total: None,
            has_more: false,
        }
    }
}

// ============================================================================
// Source Rate Limit
// ============================================================================

/// A source's own view of its remaining quota, as last reported by the
/// provider (response headers or a dedicated endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRateLimit {
    /// Requests remaining in the provider-side window.
    pub remaining: u64,
    /// Total requests allowed in the provider-side window.
    pub total: u64,
    /// When the provider-side window resets, if reported.
    pub resets_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Lead Source Trait
// ============================================================================

/// A pluggable lead discovery source.
///
/// Implementors are responsible for authenticating with the provider,
/// executing one query page, and normalizing the response into [`Lead`]s.
/// Adapters are selected by a factory keyed on [`SourceKind`].
///
/// Pacing, retry, and budget enforcement live outside this trait: the
/// orchestrator consumes budget through the rate limiter before calling
/// [`search`](LeadSource::search), and the HTTP layer underneath an adapter
/// handles burst throttling and 429 backoff.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Returns the kind of source this implementation handles.
    fn kind(&self) -> SourceKind;

    /// Returns the display name for this source.
    fn display_name(&self) -> &str {
        self.kind().display_name()
    }

    /// Returns true if this source has usable credentials.
    fn is_configured(&self) -> bool;

    /// Executes one query page against the provider.
    async fn search(&self, filters: &SearchFilters) -> Result<SearchPage, SourceError>;

    /// Returns the provider-reported quota, if any has been observed.
    fn rate_limit(&self) -> Option<SourceRateLimit> {
        None
    }
}
