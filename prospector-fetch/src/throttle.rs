//! Burst pacing within a single session.
//!
//! The [`Throttle`] keeps a rolling list of recent call instants and makes
//! callers wait until a slot opens in both the 1 second and 60 second
//! windows. This is distinct from the cross-session budget in
//! `prospector-limiter`: the limiter protects a monthly/credit budget, the
//! throttle stops one burst of calls from getting the process banned.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Padding added after a window entry ages out, so we never race the
/// provider's own clock.
const PADDING: Duration = Duration::from_millis(25);

const ONE_SECOND: Duration = Duration::from_secs(1);
const ONE_MINUTE: Duration = Duration::from_secs(60);

// ============================================================================
// Throttle
// ============================================================================

/// Rolling-window pacing over two buckets: calls per second and per minute.
#[derive(Debug)]
pub struct Throttle {
    per_second: usize,
    per_minute: usize,
    calls: Mutex<VecDeque<Instant>>,
}

impl Throttle {
    /// Creates a throttle with the given per-second and per-minute caps.
    pub fn new(per_second: usize, per_minute: usize) -> Self {
        Self {
            per_second,
            per_minute,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Waits until a call slot is free in both windows, then claims it.
    ///
    /// Suspends via the tokio timer rather than spinning; concurrent
    /// callers are serialized fairly by the internal mutex.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();

                // Drop entries that have left the 1 minute window entirely
                while calls
                    .front()
                    .is_some_and(|t| now.saturating_duration_since(*t) >= ONE_MINUTE)
                {
                    calls.pop_front();
                }

                let in_second = calls
                    .iter()
                    .filter(|t| now.saturating_duration_since(**t) < ONE_SECOND)
                    .count();

                if in_second >= self.per_second {
                    // Sleep until the oldest entry in the 1s bucket ages out
                    calls
                        .iter()
                        .find(|t| now.saturating_duration_since(**t) < ONE_SECOND)
                        .map(|t| (*t + ONE_SECOND + PADDING).saturating_duration_since(now))
                } else if calls.len() >= self.per_minute {
                    // Sleep until the oldest entry leaves the 1 minute window
                    calls
                        .front()
                        .map(|t| (*t + ONE_MINUTE + PADDING).saturating_duration_since(now))
                } else {
                    calls.push_back(now);
                    None
                }
            };

            match wait {
                None => return,
                Some(duration) => {
                    debug!(wait_ms = duration.as_millis() as u64, "Throttling call");
                    tokio::time::sleep(duration).await;
                }
            }
        }
    }

    /// Number of calls currently recorded in the minute window.
    pub async fn recent_calls(&self) -> usize {
        self.calls.lock().await.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_under_cap_is_immediate() {
        let throttle = Throttle::new(5, 100);
        let start = Instant::now();
        for _ in 0..5 {
            throttle.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(throttle.recent_calls().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_bucket_forces_wait() {
        let throttle = Throttle::new(2, 100);
        let start = Instant::now();

        throttle.acquire().await;
        throttle.acquire().await;
        // Third call in the same second must wait out the oldest entry
        throttle.acquire().await;

        let elapsed = start.elapsed();
        assert!(elapsed >= ONE_SECOND, "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_minute_bucket_forces_wait() {
        let throttle = Throttle::new(10, 3);
        let start = Instant::now();

        for _ in 0..3 {
            throttle.acquire().await;
        }
        // Fourth call must wait for the minute window to slide
        throttle.acquire().await;

        let elapsed = start.elapsed();
        assert!(elapsed >= ONE_MINUTE, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_windows_slide() {
        let throttle = Throttle::new(1, 100);

        throttle.acquire().await;
        tokio::time::advance(Duration::from_millis(1100)).await;

        let start = Instant::now();
        throttle.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
