//! Retry strategies for HTTP requests.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::FetchError;

// ============================================================================
// Retry Strategy
// ============================================================================

/// Strategy for retrying failed requests.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base delay between retries.
    pub base_delay: Duration,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum random jitter added to each delay.
    pub max_jitter: Duration,
}

impl RetryStrategy {
    /// Creates a new retry strategy with the given attempt cap.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_secs(1),
            exponential_backoff: true,
            max_delay: Duration::from_secs(60),
            max_jitter: Duration::from_millis(250),
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            exponential_backoff: false,
            max_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the maximum delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculates the deterministic delay for a given attempt number
    /// (1-based), before jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            self.base_delay
                .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        } else {
            self.base_delay
        };
        delay.min(self.max_delay)
    }

    /// The delay for an attempt with random jitter applied.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        self.delay_for_attempt(attempt) + self.jitter()
    }

    /// A random jitter up to `max_jitter`.
    pub fn jitter(&self) -> Duration {
        let jitter_ms = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// Retry Loop
// ============================================================================

/// Runs `op` until it succeeds, fails permanently, or the attempt cap is hit.
///
/// - A [`FetchError::RateLimited`] failure sleeps the provider-suggested
///   `retry_after` (or the strategy's backoff) and retries; once attempts
///   are exhausted the rate-limit error is returned carrying the endpoint
///   and the wait that would have been applied.
/// - A transient failure (timeout, connection reset) retries with the
///   strategy's backoff. A timeout is not evidence of rate limiting, so
///   nothing else is touched.
/// - Any other failure returns immediately.
pub async fn retry_request<T, F, Fut>(
    strategy: &RetryStrategy,
    endpoint: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(FetchError::RateLimited { retry_after, .. }) => {
                let backoff = retry_after
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| strategy.delay_for_attempt(attempt));
                if attempt >= strategy.max_attempts {
                    return Err(FetchError::RateLimited {
                        retry_after: Some(backoff.as_secs()),
                        endpoint: endpoint.to_string(),
                    });
                }
                warn!(
                    endpoint = %endpoint,
                    attempt,
                    wait_secs = backoff.as_secs(),
                    "Rate limited, backing off before retry"
                );
                tokio::time::sleep(backoff + strategy.jitter()).await;
            }
            Err(e) if e.is_transient() => {
                if attempt >= strategy.max_attempts {
                    return Err(e);
                }
                let delay = strategy.delay_for_attempt(attempt);
                warn!(
                    endpoint = %endpoint,
                    error = %e,
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
