//! Fixed-delay retry around a `PageFetcher`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;

use super::PageFetcher;
use crate::error_handling::{update_error_stats, InfoType, ProcessingStats, RetryExhausted};

/// How many times to try a URL and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `attempts` counts the first try. Zero is raised to one.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Fetches `url`, retrying every failure up to `policy.attempts()` times in total.
///
/// Each failed attempt is logged and counted in `stats`. The delay is slept
/// between attempts only, never after the last one.
///
/// # Errors
///
/// Returns `RetryExhausted` carrying the final attempt's error when every
/// attempt failed.
pub async fn retry_get(
    fetcher: &dyn PageFetcher,
    url: &str,
    policy: &RetryPolicy,
    stats: &ProcessingStats,
) -> Result<Vec<u8>, RetryExhausted> {
    let total = policy.attempts;
    let strategy = FixedInterval::new(policy.delay).take(total.saturating_sub(1) as usize);

    // The closure runs once per attempt, so the counter doubles as the attempt number
    let attempt_count = AtomicU32::new(0);

    let result = Retry::spawn(strategy, || {
        let attempt = attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            fetcher.fetch(url).await.map_err(|e| {
                log::warn!("Fetch attempt {}/{} for {} failed: {}", attempt, total, url, e);
                update_error_stats(stats, &e);
                if attempt < total {
                    stats.increment_info(InfoType::RetriedAttempt);
                }
                e
            })
        }
    })
    .await;

    result.map_err(|source| RetryExhausted {
        url: url.to_string(),
        attempts: attempt_count.load(Ordering::SeqCst),
        source,
    })
}
