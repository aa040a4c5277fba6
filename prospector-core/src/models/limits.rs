//! Rate-limit bookkeeping types.
//!
//! This module contains the per-source budget types:
//! - [`SourceLimits`] - Static configuration, supplied at construction
//! - [`UsageRecord`] - Mutable request/credit state for one source
//! - [`RateLimitStatus`] - Derived, read-only snapshot (never stored)

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Source Limits
// ============================================================================

/// Per-source rate-limit configuration.
///
/// Supplied when the limiter is constructed and never mutated at runtime.
/// A constraint left as `None` is treated as always-satisfied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLimits {
    /// Monthly request cap.
    pub monthly_requests: u32,
    /// Optional cap on requests within any 60 second window.
    pub requests_per_minute: Option<u32>,
    /// Optional cap on requests within any 24 hour window.
    pub requests_per_day: Option<u32>,
    /// Optional credit cost of one request.
    pub credits_per_request: Option<f64>,
    /// Optional total credit budget for the billing period.
    pub total_credits: Option<f64>,
}

impl SourceLimits {
    /// Creates limits with only a monthly request cap.
    pub fn monthly(monthly_requests: u32) -> Self {
        Self {
            monthly_requests,
            requests_per_minute: None,
            requests_per_day: None,
            credits_per_request: None,
            total_credits: None,
        }
    }

    /// Creates effectively unlimited limits (used for the manual source).
    pub fn unlimited() -> Self {
        Self::monthly(u32::MAX)
    }

    /// Sets the per-minute cap.
    pub fn with_per_minute(mut self, cap: u32) -> Self {
        self.requests_per_minute = Some(cap);
        self
    }

    /// Sets the per-day cap.
    pub fn with_per_day(mut self, cap: u32) -> Self {
        self.requests_per_day = Some(cap);
        self
    }

    /// Sets the credit budget.
    pub fn with_credits(mut self, per_request: f64, total: f64) -> Self {
        self.credits_per_request = Some(per_request);
        self.total_credits = Some(total);
        self
    }

    /// Returns the credit cost of one request (1.0 when not configured).
    pub fn request_cost(&self) -> f64 {
        self.credits_per_request.unwrap_or(1.0)
    }
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

// ============================================================================
// Usage Record
// ============================================================================

/// Mutable per-source usage state.
///
/// One record exists per source, created lazily on first use and reset to
/// zero when `now >= resets_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Request timestamps within the current billing window, oldest first.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Credits consumed since the last reset.
    pub credits_used: f64,
    /// When this record next resets (first instant of next calendar month).
    pub resets_at: DateTime<Utc>,
}

impl UsageRecord {
    /// Creates a zeroed record that resets at the start of the month after `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            timestamps: Vec::new(),
            credits_used: 0.0,
            resets_at: next_month_start(now),
        }
    }

    /// Resets the record if its reset time has passed.
    ///
    /// Returns true if a reset happened.
    pub fn reset_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.resets_at {
            return false;
        }
        self.timestamps.clear();
        self.credits_used = 0.0;
        self.resets_at = next_month_start(now);
        true
    }

    /// Counts requests within the trailing window of `window_secs` seconds.
    pub fn requests_in_window(&self, now: DateTime<Utc>, window_secs: i64) -> u32 {
        let cutoff = now - chrono::Duration::seconds(window_secs);
        u32::try_from(self.timestamps.iter().filter(|t| **t > cutoff).count()).unwrap_or(u32::MAX)
    }

    /// Records one consumed request.
    pub fn record_request(&mut self, now: DateTime<Utc>, credits: f64) {
        self.timestamps.push(now);
        self.credits_used += credits;
    }

    /// Number of requests used in the current billing window.
    pub fn requests_used(&self) -> u32 {
        u32::try_from(self.timestamps.len()).unwrap_or(u32::MAX)
    }
}

/// Returns the first instant of the calendar month after `now`.
pub fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

// ============================================================================
// Rate Limit Status
// ============================================================================

/// Derived, read-only view of one source's budget.
///
/// Computed on demand from a [`UsageRecord`] and its [`SourceLimits`];
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Requests used in the current billing window.
    pub requests_used: u32,
    /// Requests remaining against the monthly cap.
    pub requests_remaining: u32,
    /// Credits consumed since the last reset.
    pub credits_used: f64,
    /// Credits remaining, when a budget is configured.
    pub credits_remaining: Option<f64>,
    /// When the billing window resets.
    pub resets_at: DateTime<Utc>,
    /// Whether every configured constraint currently permits a request.
    pub can_make_request: bool,
}

impl RateLimitStatus {
    /// Fraction of the monthly budget still available, in `[0, 1]`.
    ///
    /// Used to rank sources: the least-exhausted source scores highest.
    pub fn headroom(&self) -> f64 {
        let total = u64::from(self.requests_used) + u64::from(self.requests_remaining);
        if total == 0 {
            return 0.0;
        }
        f64::from(self.requests_remaining) / total as f64
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_next_month_start() {
        assert_eq!(
            next_month_start(at(2025, 3, 15)),
            Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()
        );
        // December rolls over the year
        assert_eq!(
            next_month_start(at(2025, 12, 31)),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_record_reset_when_due() {
        let created = at(2025, 3, 15);
        let mut record = UsageRecord::new(created);
        record.record_request(created, 2.0);
        assert_eq!(record.requests_used(), 1);

        // Before the reset boundary nothing happens
        assert!(!record.reset_if_due(at(2025, 3, 31)));
        assert_eq!(record.requests_used(), 1);

        // At/after the boundary the record zeroes and advances
        assert!(record.reset_if_due(at(2025, 4, 2)));
        assert!(record.timestamps.is_empty());
        assert_eq!(record.credits_used, 0.0);
        assert_eq!(
            record.resets_at,
            Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_requests_in_window() {
        let now = at(2025, 3, 15);
        let mut record = UsageRecord::new(now);
        record.record_request(now - chrono::Duration::seconds(120), 1.0);
        record.record_request(now - chrono::Duration::seconds(30), 1.0);
        record.record_request(now, 1.0);

        assert_eq!(record.requests_in_window(now, 60), 2);
        assert_eq!(record.requests_in_window(now, 86_400), 3);
    }

    #[test]
    fn test_headroom_ranking() {
        let fresh = RateLimitStatus {
            requests_used: 10,
            requests_remaining: 90,
            credits_used: 0.0,
            credits_remaining: None,
            resets_at: at(2025, 4, 1),
            can_make_request: true,
        };
        let worn = RateLimitStatus {
            requests_remaining: 20,
            requests_used: 80,
            ..fresh.clone()
        };
        assert!(fresh.headroom() > worn.headroom());
    }

    #[test]
    fn test_limits_builder() {
        let limits = SourceLimits::monthly(500)
            .with_per_minute(10)
            .with_credits(2.0, 1000.0);
        assert_eq!(limits.monthly_requests, 500);
        assert_eq!(limits.requests_per_minute, Some(10));
        assert_eq!(limits.request_cost(), 2.0);
        assert_eq!(SourceLimits::monthly(500).request_cost(), 1.0);
    }
}
