//! Source descriptor system.
//!
//! A descriptor contains all the static configuration for a source:
//! - Identity (the [`SourceKind`] it serves)
//! - Authentication (style and environment fallbacks)
//! - Burst pacing caps for the HTTP throttle
//! - Default cross-session budget
//! - Search plan (how to build the query and parse the response)

use prospector_core::{SearchFilters, SearchPage, SourceCredentials, SourceError, SourceKind, SourceLimits};
use url::Url;

// ============================================================================
// Auth Style
// ============================================================================

/// How a source expects its API key on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>` header.
    Bearer,
    /// A custom header carrying the raw key.
    ApiKeyHeader(&'static str),
    /// A query-string parameter carrying the raw key.
    QueryParam(&'static str),
}

// ============================================================================
// Burst Caps
// ============================================================================

/// Per-second and per-minute pacing caps for one source.
///
/// These feed the HTTP throttle, not the budget limiter: they keep a single
/// burst of calls under the provider's short-window radar.
#[derive(Debug, Clone, Copy)]
pub struct BurstCaps {
    /// Maximum calls in any rolling 1 second window.
    pub per_second: usize,
    /// Maximum calls in any rolling 60 second window.
    pub per_minute: usize,
}

// ============================================================================
// Search Plan
// ============================================================================

/// How to query one source and read its response.
pub struct SearchPlan {
    /// Stable endpoint label used for rate-limit bookkeeping and errors,
    /// e.g. `hunter/domain-search`.
    pub endpoint: &'static str,
    /// Base URL of the search endpoint.
    pub base_url: &'static str,
    /// Maps filters onto the provider's query parameters.
    pub build_query: fn(&SearchFilters, &mut Url),
    /// Parses the provider's JSON response into a page of leads.
    pub parse_page: fn(&serde_json::Value) -> Result<SearchPage, SourceError>,
}

// ============================================================================
// Source Descriptor
// ============================================================================

/// Complete static configuration for one source.
pub struct SourceDescriptor {
    /// Source identifier.
    pub id: SourceKind,
    /// Environment variable consulted when the hunt config carries no key.
    pub api_key_env: &'static str,
    /// Environment variable for the secret, for key-pair sources.
    pub api_secret_env: Option<&'static str>,
    /// How the key goes on the wire.
    pub auth: AuthStyle,
    /// Burst pacing caps.
    pub burst: BurstCaps,
    /// Default cross-session budget when the caller configures none.
    pub default_limits: fn() -> SourceLimits,
    /// How to search this source.
    pub search: SearchPlan,
}

impl SourceDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &'static str {
        self.id.cli_name()
    }

    /// Builds the full search URL for the given filters, including
    /// query-parameter authentication when the source uses it.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Other` if the descriptor's base URL is not
    /// parseable, which indicates a broken descriptor rather than bad input.
    pub fn search_url(
        &self,
        filters: &SearchFilters,
        credentials: &SourceCredentials,
    ) -> Result<Url, SourceError> {
        let mut url = Url::parse(self.search.base_url)
            .map_err(|e| SourceError::Other(format!("invalid base URL: {e}")))?;

        (self.search.build_query)(filters, &mut url);

        if let AuthStyle::QueryParam(param) = self.auth {
            url.query_pairs_mut()
                .append_pair(param, &credentials.api_key);
        }

        Ok(url)
    }

    /// The request headers carrying this source's authentication.
    pub fn auth_headers(&self, credentials: &SourceCredentials) -> Vec<(String, String)> {
        match self.auth {
            AuthStyle::Bearer => vec![(
                "authorization".to_string(),
                format!("Bearer {}", credentials.api_key),
            )],
            AuthStyle::ApiKeyHeader(name) => {
                vec![(name.to_string(), credentials.api_key.clone())]
            }
            AuthStyle::QueryParam(_) => Vec::new(),
        }
    }

    /// Default budget for this source.
    pub fn limits(&self) -> SourceLimits {
        (self.default_limits)()
    }
}

// ============================================================================
// Parse Helpers
// ============================================================================

/// Reads an optional string field, treating empty strings as absent.
pub(crate) fn opt_str(value: &serde_json::Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reads an optional u64 field.
pub(crate) fn opt_u64(value: &serde_json::Value, field: &str) -> Option<u64> {
    value.get(field).and_then(serde_json::Value::as_u64)
}

// ============================================================================
// Tests
// ============================================================================
