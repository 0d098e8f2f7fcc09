//! Opt-in retry with bounded exponential backoff

use rand::Rng;
use std::time::Duration;

use crate::config::retry as defaults;
use crate::error::TfeError;

/// Retry settings for transient failures
///
/// Applies to `ServerError` responses and network-level transport failures.
/// GET requests are retried; other methods only when the request opted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay: defaults::BASE_DELAY,
            max_delay: defaults::MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Whether a failed attempt number `attempt` (1-based) may be repeated
    pub fn should_retry(&self, attempt: u32, error: &TfeError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }

    /// Backoff before attempt `attempt + 1`
    ///
    /// `base * 2^(attempt-1)` capped at `max_delay`, jittered by ±20%.
    /// A server-provided `Retry-After` wins when present, still capped.
    pub fn delay_for_attempt(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(after) = retry_after {
            return after.min(self.max_delay);
        }
        let shift = attempt.saturating_sub(1).min(30);
        let exp = 1u32 << shift;
        let base = self.base_delay.saturating_mul(exp).min(self.max_delay);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        base.mul_f64(jitter).min(self.max_delay)
    }
}

/// Parse a `Retry-After` header given in seconds
pub(crate) fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
