//! Hunt session types.
//!
//! A hunt is one bounded discovery session across a configured set of
//! sources. These types describe its configuration, in-flight progress,
//! and final result.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::lead::{Lead, SearchFilters};
use super::limits::RateLimitStatus;
use super::source::{SourceCredentials, SourceKind};

// ============================================================================
// Hunt Config
// ============================================================================

/// Parameters for one discovery session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntConfig {
    /// Query filters applied to every source.
    pub filters: SearchFilters,
    /// Sources to try, in caller-preferred order.
    pub sources: Vec<SourceKind>,
    /// Per-source API credentials.
    #[serde(default)]
    pub credentials: HashMap<SourceKind, SourceCredentials>,
    /// Maximum leads collected from any single source.
    pub max_results_per_source: usize,
    /// Whether rate limits must be respected. Disabling is an explicit
    /// opt-out for trusted/offline sources; consumption is still recorded.
    pub respect_rate_limits: bool,
}

impl HuntConfig {
    /// Creates a config over the given sources with default bounds.
    pub fn new(filters: SearchFilters, sources: Vec<SourceKind>) -> Self {
        Self {
            filters,
            sources,
            credentials: HashMap::new(),
            max_results_per_source: 25,
            respect_rate_limits: true,
        }
    }

    /// Adds credentials for a source.
    pub fn with_credentials(mut self, source: SourceKind, creds: SourceCredentials) -> Self {
        self.credentials.insert(source, creds);
        self
    }

    /// Sets the per-source result cap.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results_per_source = max;
        self
    }
}

// ============================================================================
// Source Stats
// ============================================================================

/// Per-source counters accumulated during a hunt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceStats {
    /// Unique leads contributed by this source.
    pub leads_found: usize,
    /// Failed calls (after retries) against this source.
    pub errors: usize,
    /// Whether the source hit a rate limit during the hunt.
    pub rate_limited: bool,
    /// Whether the source finished (exhausted, capped, or retired).
    pub completed: bool,
}

// ============================================================================
// Hunt State
// ============================================================================

/// Lifecycle of one hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HuntState {
    /// Constructed but not started.
    Idle,
    /// The discovery loop is running.
    Running,
    /// All sources attempted; partial per-source failures are still Completed.
    Completed,
    /// Cancelled by the caller before completion.
    Aborted,
}

// ============================================================================
// Progress & Result
// ============================================================================

/// Point-in-time snapshot emitted after every loop iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntProgress {
    /// Lifecycle state at the time of the snapshot: `Running` while the
    /// loop is live, the terminal state in the final snapshot.
    pub state: HuntState,
    /// Cumulative unique leads found so far.
    pub total_leads: usize,
    /// Per-source counters.
    pub source_stats: HashMap<SourceKind, SourceStats>,
    /// Sources that have finished.
    pub completed_sources: Vec<SourceKind>,
    /// The source the orchestrator is currently working.
    pub current_source: Option<SourceKind>,
}

/// Final view over a finished hunt.
///
/// A hunt never fails as a whole: partial results are always returned and
/// per-source flags explain why fewer leads than expected were found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntResult {
    /// All unique leads, in provider-call completion order.
    pub leads: Vec<Lead>,
    /// Final per-source counters.
    pub source_stats: HashMap<SourceKind, SourceStats>,
    /// Snapshot of every source's rate-limit status, for diagnostics
    /// and resumption.
    pub limits: Vec<(SourceKind, RateLimitStatus)>,
    /// Terminal state: `Completed` or `Aborted`.
    pub state: HuntState,
}

impl HuntResult {
    /// Total unique leads found.
    pub fn total_leads(&self) -> usize {
        self.leads.len()
    }

    /// Returns the stats for one source, if it participated.
    pub fn stats_for(&self, source: SourceKind) -> Option<&SourceStats> {
        self.source_stats.get(&source)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HuntConfig::new(
            SearchFilters::for_domain("example.com"),
            vec![SourceKind::Hunter, SourceKind::Apollo],
        )
        .with_credentials(SourceKind::Hunter, SourceCredentials::new("key"))
        .with_max_results(10);

        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.max_results_per_source, 10);
        assert!(config.respect_rate_limits);
        assert!(config.credentials.contains_key(&SourceKind::Hunter));
    }

    #[test]
    fn test_result_accessors() {
        let mut stats = HashMap::new();
        stats.insert(
            SourceKind::Hunter,
            SourceStats {
                leads_found: 3,
                ..SourceStats::default()
            },
        );
        let result = HuntResult {
            leads: vec![Lead::new(SourceKind::Hunter, "a", 80)],
            source_stats: stats,
            limits: Vec::new(),
            state: HuntState::Completed,
        };

        assert_eq!(result.total_leads(), 1);
        assert_eq!(result.stats_for(SourceKind::Hunter).unwrap().leads_found, 3);
        assert!(result.stats_for(SourceKind::Apollo).is_none());
    }
}
