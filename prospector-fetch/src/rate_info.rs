//! Response-driven rate-limit tracking.
//!
//! Providers report their own view of the caller's quota in response
//! headers. We parse those after every call and keep the latest reading
//! per endpoint, warning when usage crosses 80%.

use chrono::{DateTime, TimeZone, Utc};
use prospector_core::SourceRateLimit;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

/// Usage fraction above which a warning is emitted.
const WARN_THRESHOLD: f64 = 80.0;

// ============================================================================
// Rate Limit Info
// ============================================================================

/// A provider's last-reported quota for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitInfo {
    /// Requests remaining in the provider-side window.
    pub remaining: u64,
    /// Total requests allowed in the provider-side window.
    pub limit: u64,
    /// When the provider-side window resets, if reported (epoch seconds).
    pub resets_at: Option<DateTime<Utc>>,
}

impl RateLimitInfo {
    /// Parses rate-limit headers from a response.
    ///
    /// Understands the common `x-ratelimit-remaining` /
    /// `x-ratelimit-limit` / `x-ratelimit-reset` triple; returns `None`
    /// unless both remaining and limit are present.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_u64(headers, "x-ratelimit-remaining")?;
        let limit = header_u64(headers, "x-ratelimit-limit")?;
        let resets_at = header_u64(headers, "x-ratelimit-reset")
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Some(Self {
            remaining,
            limit,
            resets_at,
        })
    }

    /// Percentage of the provider-side window already used.
    pub fn usage_percent(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        let used = self.limit.saturating_sub(self.remaining);
        (used as f64 / self.limit as f64) * 100.0
    }

    /// Returns true if usage has crossed the warning threshold.
    pub fn is_approaching_limit(&self) -> bool {
        self.usage_percent() > WARN_THRESHOLD
    }

    /// Converts to the core trait's quota view.
    pub fn to_source_rate_limit(&self) -> SourceRateLimit {
        SourceRateLimit {
            remaining: self.remaining,
            total: self.limit,
            resets_at: self.resets_at,
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

// ============================================================================
// Rate Info Cache
// ============================================================================

/// Latest [`RateLimitInfo`] per endpoint.
#[derive(Debug, Default)]
pub struct RateInfoCache {
    inner: Mutex<HashMap<String, RateLimitInfo>>,
}

impl RateInfoCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest reading for an endpoint, warning once per call
    /// when usage is past the threshold.
    pub fn update(&self, endpoint: &str, info: RateLimitInfo) {
        if info.is_approaching_limit() {
            warn!(
                endpoint = %endpoint,
                remaining = info.remaining,
                limit = info.limit,
                usage_percent = info.usage_percent(),
                "Endpoint approaching provider rate limit"
            );
        }
        if let Ok(mut map) = self.inner.lock() {
            map.insert(endpoint.to_string(), info);
        }
    }

    /// Returns the latest reading for an endpoint, if any.
    pub fn get(&self, endpoint: &str) -> Option<RateLimitInfo> {
        self.inner.lock().ok().and_then(|map| map.get(endpoint).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
