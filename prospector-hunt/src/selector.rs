//! Source selection.
//!
//! Given the not-yet-finished sources and the limiter's view of each
//! budget, picks which source the orchestrator should call next.

use prospector_core::SourceKind;
use prospector_limiter::RateLimiter;
use tracing::debug;

// ============================================================================
// Source Selector
// ============================================================================

/// Picks the next source to query.
pub struct SourceSelector;

impl SourceSelector {
    /// Returns the next source to call, or `None` if every remaining
    /// source is currently out of budget.
    ///
    /// When `respect_limits` is false the first remaining source is
    /// returned unconditionally (plain round-robin). Otherwise the
    /// remaining sources are scanned in caller-preferred order and the
    /// first one the limiter permits wins; if none is permitted directly,
    /// the limiter's least-exhausted pick is used as a fallback, but only
    /// if that source is still in the remaining set.
    pub async fn next(
        remaining: &[SourceKind],
        limiter: &RateLimiter,
        respect_limits: bool,
    ) -> Option<SourceKind> {
        if !respect_limits {
            return remaining.first().copied();
        }

        for &source in remaining {
            if limiter.get_status(source).await.can_make_request {
                return Some(source);
            }
        }

        // Least-exhausted fallback, valid only while the hunt still wants it
        if let Some(best) = limiter.best_source().await {
            if remaining.contains(&best) {
                debug!(source = %best, "Falling back to least-exhausted source");
                return Some(best);
            }
        }

        None
    }
}

// ============================================================================
// Tests
// ============================================================================
