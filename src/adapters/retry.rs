//! Retry policy for the landing pages API.
//!
//! Only a fixed set of transient statuses is retried. The server's
//! `Retry-After` wins over the computed backoff.

use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;

pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Cap on the computed exponential backoff.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Cap on a server-provided `Retry-After`.
pub const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Upper bound of the random jitter, as a percentage of the backoff.
pub const RETRY_JITTER_PERCENT: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay_ms: u64) -> Self {
        Self {
            retries,
            base_delay_ms,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    pub fn is_retryable(status: StatusCode) -> bool {
        RETRYABLE_STATUSES.contains(&status.as_u16())
    }

    /// `base * 2^(attempt-1)`, capped. `attempt` is the 1-based attempt that just failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        let delay = self.base_delay_ms.saturating_mul(factor).min(MAX_BACKOFF_MS);
        Duration::from_millis(delay)
    }

    pub fn backoff_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.backoff(attempt).as_millis() as u64;
        let jitter_range = base * RETRY_JITTER_PERCENT / 100;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..=jitter_range)
        } else {
            0
        };
        Duration::from_millis(base + jitter)
    }

    pub fn delay_for(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(|value| parse_retry_after(value, Utc::now()))
            .unwrap_or_else(|| self.backoff_with_jitter(attempt))
    }
}

/// Delta-seconds (`120`) or an HTTP date. Dates in the past mean "now".
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS)));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    let wait = (at - now).to_std().unwrap_or(Duration::ZERO);
    Some(wait.min(Duration::from_secs(MAX_RETRY_AFTER_SECS)))
}
