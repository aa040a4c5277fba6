//! HTTP client abstractions.

use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::rate_info::{RateInfoCache, RateLimitInfo};
use crate::retry::{retry_request, RetryStrategy};
use crate::throttle::Throttle;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client with throttling, retry, and rate-limit header tracking.
///
/// One client is shared by all source adapters in a hunt. Every call is
/// bounded by a hard timeout so a stuck provider can never block the
/// orchestrator indefinitely.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
    throttle: Option<Arc<Throttle>>,
    rate_info: Arc<RateInfoCache>,
    timeout_secs: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom per-call timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prospector/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
            throttle: None,
            rate_info: Arc::new(RateInfoCache::new()),
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Enables burst throttling with the given per-second and per-minute caps.
    pub fn with_throttle(mut self, per_second: usize, per_minute: usize) -> Self {
        self.throttle = Some(Arc::new(Throttle::new(per_second, per_minute)));
        self
    }

    /// The latest provider-reported quota for an endpoint, if observed.
    pub fn rate_info(&self, endpoint: &str) -> Option<RateLimitInfo> {
        self.rate_info.get(endpoint)
    }

    /// Performs a GET request returning JSON, with throttling and retries.
    ///
    /// `endpoint` is a stable label (e.g. `hunter/domain-search`) used for
    /// rate-limit bookkeeping and error reporting; `headers` carries the
    /// source's authentication.
    pub async fn get_json(
        &self,
        endpoint: &str,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<serde_json::Value, FetchError> {
        retry_request(&self.retry_strategy, endpoint, || {
            self.attempt_get(endpoint, url, headers)
        })
        .await
    }

    /// One throttled GET attempt, without retries.
    async fn attempt_get(
        &self,
        endpoint: &str,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<serde_json::Value, FetchError> {
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }

        debug!(endpoint = %endpoint, url = %url, "Making GET request");

        let mut request = self.inner.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Http(e)
            }
        })?;

        // Track provider-reported quota from every response
        if let Some(info) = RateLimitInfo::from_headers(response.headers()) {
            self.rate_info.update(endpoint, info);
        }

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FetchError::RateLimited {
                retry_after,
                endpoint: endpoint.to_string(),
            });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::AuthenticationFailed(
                "Invalid or expired credentials".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status code: {status}"
            )));
        }

        Ok(response.json().await?)
    }
}

// ============================================================================
// Tests
// ============================================================================
