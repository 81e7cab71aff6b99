//! Retry pacing for read-only RPC calls.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Delay before the next try after `failures` consecutive failed attempts,
/// or `None` once the retry budget is spent.
///
/// The delay is `base_delay_ms * 2^(failures-1)`, capped at `max_delay_ms`,
/// plus up to 10% jitter. Disabled retries always give `None`.
pub fn retry_delay(retries: &RetryConfig, failures: u32) -> Option<Duration> {
    if !retries.enabled || failures == 0 || failures >= retries.max_attempts {
        return None;
    }

    let factor = 2u64.saturating_pow(failures - 1);
    let delay_ms = retries
        .base_delay_ms
        .saturating_mul(factor)
        .min(retries.max_delay_ms);

    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Some(Duration::from_millis(delay_ms + jitter))
}
