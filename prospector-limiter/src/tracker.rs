//! Pure per-source usage bookkeeping.
//!
//! [`UsageTracker`] owns the per-source [`UsageRecord`]s and evaluates
//! every configured constraint against an explicit `now`. It performs no
//! I/O and takes no locks; [`crate::RateLimiter`] serializes access.

use chrono::{DateTime, Utc};
use prospector_core::{RateLimitStatus, SourceKind, SourceLimits, UsageRecord};
use std::collections::HashMap;

// ============================================================================
// Usage Tracker
// ============================================================================

/// Sliding-window and budget bookkeeping for every source.
#[derive(Debug)]
pub struct UsageTracker {
    /// Static per-source configuration. Never mutated after construction.
    limits: HashMap<SourceKind, SourceLimits>,
    /// Mutable per-source state, created lazily on first use.
    records: HashMap<SourceKind, UsageRecord>,
}

impl UsageTracker {
    /// Creates a tracker over the given per-source limits.
    ///
    /// Sources absent from the map are treated as unlimited.
    pub fn new(limits: HashMap<SourceKind, SourceLimits>) -> Self {
        Self {
            limits,
            records: HashMap::new(),
        }
    }

    /// Returns the limits configured for a source.
    pub fn limits_for(&self, source: SourceKind) -> SourceLimits {
        self.limits.get(&source).cloned().unwrap_or_default()
    }

    /// Returns the sources this tracker has limits configured for,
    /// in the canonical `SourceKind::all()` order.
    pub fn configured_sources(&self) -> Vec<SourceKind> {
        SourceKind::all()
            .iter()
            .filter(|k| self.limits.contains_key(k))
            .copied()
            .collect()
    }

    /// Derives the rate-limit status for a source at `now`.
    ///
    /// Lazily creates a zeroed record, applies the monthly reset if due,
    /// then evaluates the monthly cap, per-minute cap, per-day cap, and
    /// credit budget in that order. A constraint that is not configured
    /// is always satisfied.
    pub fn status_at(&mut self, source: SourceKind, now: DateTime<Utc>) -> RateLimitStatus {
        let cost = self.limits_for(source).request_cost();
        self.status_for_cost(source, cost, now)
    }

    /// Like [`status_at`](Self::status_at) but evaluating the credit budget
    /// against an explicit per-request cost.
    pub fn status_for_cost(
        &mut self,
        source: SourceKind,
        cost: f64,
        now: DateTime<Utc>,
    ) -> RateLimitStatus {
        let limits = self.limits_for(source);
        let record = self
            .records
            .entry(source)
            .or_insert_with(|| UsageRecord::new(now));
        record.reset_if_due(now);

        let requests_used = record.requests_used();
        let requests_remaining = limits.monthly_requests.saturating_sub(requests_used);

        let mut can_make_request = requests_used < limits.monthly_requests;
        if let Some(cap) = limits.requests_per_minute {
            can_make_request = can_make_request && record.requests_in_window(now, 60) < cap;
        }
        if let Some(cap) = limits.requests_per_day {
            can_make_request = can_make_request && record.requests_in_window(now, 86_400) < cap;
        }
        if let Some(total) = limits.total_credits {
            can_make_request = can_make_request && total - record.credits_used >= cost;
        }

        RateLimitStatus {
            requests_used,
            requests_remaining,
            credits_used: record.credits_used,
            credits_remaining: limits.total_credits.map(|t| t - record.credits_used),
            resets_at: record.resets_at,
            can_make_request,
        }
    }

    /// Atomically checks permission and consumes one request slot.
    ///
    /// Returns false with no side effect when any constraint denies the
    /// request; callers can probe an exhausted source without cost.
    /// `credits` defaults to the source's configured per-request cost.
    pub fn consume_at(
        &mut self,
        source: SourceKind,
        credits: Option<f64>,
        now: DateTime<Utc>,
    ) -> bool {
        let cost = credits.unwrap_or_else(|| self.limits_for(source).request_cost());
        let status = self.status_for_cost(source, cost, now);
        if !status.can_make_request {
            return false;
        }
        // Record exists after status_for_cost.
        if let Some(record) = self.records.get_mut(&source) {
            record.record_request(now, cost);
            return true;
        }
        false
    }

    /// Picks the least-exhausted source that can serve a request now.
    ///
    /// Only configured, non-manual sources qualify; ranking is by monthly
    /// headroom (`remaining / (used + remaining)`) descending. Never
    /// returns a source whose status denies the request.
    pub fn best_source_at(
        &mut self,
        required_credits: f64,
        now: DateTime<Utc>,
    ) -> Option<SourceKind> {
        let mut best: Option<(SourceKind, f64)> = None;
        for source in self.configured_sources() {
            if source.is_manual() {
                continue;
            }
            // A request against this source costs at least its own
            // configured per-request rate.
            let cost = required_credits.max(self.limits_for(source).request_cost());
            let status = self.status_for_cost(source, cost, now);
            if !status.can_make_request {
                continue;
            }
            let headroom = status.headroom();
            let better = match best {
                Some((_, current)) => headroom > current,
                None => true,
            };
            if better {
                best = Some((source, headroom));
            }
        }
        best.map(|(source, _)| source)
    }

    /// Read access to the raw records, for state export.
    pub fn records(&self) -> &HashMap<SourceKind, UsageRecord> {
        &self.records
    }

    /// Replaces all records, for state import.
    pub fn replace_records(&mut self, records: HashMap<SourceKind, UsageRecord>) {
        self.records = records;
    }
}

// ============================================================================
// Tests
// ============================================================================
