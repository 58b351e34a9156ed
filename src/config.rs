//! Fetch tuning constants shared by the retry primitive and the scheduler.

use rand::Rng;
use std::time::Duration;

/// Maximum number of attempts for a single upstream call.
/// 5 attempts with exponential backoff recovers from transient rate limiting
/// while keeping the worst-case wait per call bounded (~63s).
pub const MAX_RETRIES: u32 = 5;

/// Base backoff delay in milliseconds.
/// 1 second is long enough for the upstream rate-limit window to drain but
/// short enough to not overly delay recovery from a transient error.
pub const BASE_DELAY_MS: u64 = 1_000;

/// Cap applied to any single backoff delay in milliseconds.
/// 32 seconds corresponds to the fifth doubling of the base delay.
pub const MAX_DELAY_MS: u64 = 32_000;

/// Concurrent upstream fetches per batch wave.
/// 10 keeps pressure on the Instantly API predictable across campaigns.
pub const MAX_CONCURRENT_REQUESTS: usize = 10;

/// Widest window the daily-analytics endpoint accepts, in calendar days.
pub const ANALYTICS_WINDOW_DAYS: u32 = 7;

/// Calculate the backoff delay for a failed attempt (0-indexed).
///
/// `min(BASE_DELAY * 2^attempt + jitter, MAX_DELAY)` with jitter drawn
/// uniformly from `[0, 1)` seconds, so tasks that were rate-limited together
/// do not retry in lockstep.
pub fn backoff_delay(attempt: u32) -> Duration {
    let exponential = BASE_DELAY_MS.saturating_mul(2u64.saturating_pow(attempt));
    let jitter_ms = rand::thread_rng().gen_range(0..1_000);
    Duration::from_millis(exponential.saturating_add(jitter_ms).min(MAX_DELAY_MS))
}
