//! Shared rate limiter over the usage tracker.
//!
//! [`RateLimiter`] serializes all tracker access through one mutex so
//! check-then-consume is a single logical step: two hunts sharing the
//! limiter can never double-consume the same budget slot.

use chrono::{DateTime, TimeZone, Utc};
use prospector_core::{RateLimitStatus, SourceKind, SourceLimits, UsageRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::LimiterError;
use crate::tracker::UsageTracker;

/// Fixed polling interval for [`RateLimiter::wait_for_availability`].
const POLL_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// State Wire Format
// ============================================================================

/// One exported record: the only on-disk format owned by this crate.
///
/// Timestamps and reset times are epoch milliseconds so the exported state
/// is a flat numeric JSON array that round-trips exactly.
#[derive(Debug, Serialize, Deserialize)]
struct StateEntry {
    source: String,
    timestamps: Vec<i64>,
    credits_used: f64,
    resets_at: i64,
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

// ============================================================================
// Rate Limiter
// ============================================================================

/// Async, shareable wrapper around [`UsageTracker`].
///
/// Constructed explicitly with the per-source limits and injected into the
/// orchestrator; scope one instance per set of provider credentials.
pub struct RateLimiter {
    tracker: Mutex<UsageTracker>,
}

impl RateLimiter {
    /// Creates a limiter over the given per-source limits.
    pub fn new(limits: HashMap<SourceKind, SourceLimits>) -> Self {
        Self {
            tracker: Mutex::new(UsageTracker::new(limits)),
        }
    }

    /// Derives the current rate-limit status for a source.
    pub async fn get_status(&self, source: SourceKind) -> RateLimitStatus {
        self.tracker.lock().await.status_at(source, Utc::now())
    }

    /// Checks permission and consumes one request slot atomically.
    ///
    /// The credit cost is the source's configured per-request cost
    /// (1.0 when none is configured). Denial has no side effect.
    pub async fn check_and_consume(&self, source: SourceKind) -> bool {
        self.check_and_consume_credits(source, None).await
    }

    /// Like [`check_and_consume`](Self::check_and_consume) with an explicit
    /// credit cost.
    pub async fn check_and_consume_credits(
        &self,
        source: SourceKind,
        credits: Option<f64>,
    ) -> bool {
        let permitted = self
            .tracker
            .lock()
            .await
            .consume_at(source, credits, Utc::now());
        debug!(source = %source, permitted, "check_and_consume");
        permitted
    }

    /// Picks the least-exhausted source able to serve one request now.
    pub async fn best_source(&self) -> Option<SourceKind> {
        self.best_source_for(1.0).await
    }

    /// Picks the least-exhausted source with at least `required_credits`
    /// of budget headroom. The manual sentinel source never qualifies.
    pub async fn best_source_for(&self, required_credits: f64) -> Option<SourceKind> {
        self.tracker
            .lock()
            .await
            .best_source_at(required_credits, Utc::now())
    }

    /// Polls until the source becomes available or `max_wait` elapses.
    ///
    /// Only meaningful for sources with a per-minute cap: any other denial
    /// cannot clear within a realistic wait, so this returns false
    /// immediately.
    pub async fn wait_for_availability(&self, source: SourceKind, max_wait: Duration) -> bool {
        let has_minute_cap = self
            .tracker
            .lock()
            .await
            .limits_for(source)
            .requests_per_minute
            .is_some();
        if !has_minute_cap {
            return false;
        }

        let started = tokio::time::Instant::now();
        loop {
            if self.get_status(source).await.can_make_request {
                return true;
            }
            if started.elapsed() + POLL_INTERVAL > max_wait {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Snapshot of every configured source's status, for diagnostics.
    pub async fn snapshot_all(&self) -> Vec<(SourceKind, RateLimitStatus)> {
        let mut tracker = self.tracker.lock().await;
        let now = Utc::now();
        tracker
            .configured_sources()
            .into_iter()
            .map(|source| (source, tracker.status_at(source, now)))
            .collect()
    }

    // ========================================================================
    // State Export/Import
    // ========================================================================

    /// Serializes all usage records to the flat JSON state format.
    ///
    /// # Errors
    ///
    /// Returns `LimiterError::Json` if serialization fails.
    pub async fn export_state(&self) -> Result<String, LimiterError> {
        let tracker = self.tracker.lock().await;
        let records = tracker.records();

        // Canonical SourceKind order keeps the export deterministic.
        let entries: Vec<StateEntry> = SourceKind::all()
            .iter()
            .filter_map(|source| records.get(source).map(|r| (source, r)))
            .map(|(source, record)| StateEntry {
                source: source.cli_name().to_string(),
                timestamps: record.timestamps.iter().map(DateTime::timestamp_millis).collect(),
                credits_used: record.credits_used,
                resets_at: record.resets_at.timestamp_millis(),
            })
            .collect();

        Ok(serde_json::to_string(&entries)?)
    }

    /// Restores usage records from a previous [`export_state`](Self::export_state).
    ///
    /// Fails soft: malformed input is logged and ignored, leaving the
    /// current state untouched. Unknown sources and unrepresentable
    /// timestamps are skipped per entry.
    pub async fn import_state(&self, raw: &str) {
        let entries: Vec<StateEntry> = match serde_json::from_str(raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed limiter state");
                return;
            }
        };

        let mut records = HashMap::new();
        for entry in entries {
            let Some(source) = SourceKind::from_cli_name(&entry.source) else {
                warn!(source = %entry.source, "Skipping unknown source in limiter state");
                continue;
            };
            let Some(resets_at) = from_millis(entry.resets_at) else {
                warn!(source = %entry.source, "Skipping record with invalid reset time");
                continue;
            };
            let timestamps = entry.timestamps.iter().copied().filter_map(from_millis).collect();
            records.insert(
                source,
                UsageRecord {
                    timestamps,
                    credits_used: entry.credits_used,
                    resets_at,
                },
            );
        }

        let count = records.len();
        self.tracker.lock().await.replace_records(records);
        debug!(sources = count, "Limiter state imported");
    }
}

// ============================================================================
// Tests
// ============================================================================
