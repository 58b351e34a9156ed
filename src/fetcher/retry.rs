//! Retrying fetch primitive with exponential backoff and jitter.
//!
//! Wraps any single upstream call. Rate-limit responses and transport
//! failures both consume one attempt from the same budget; non-retriable
//! failures surface immediately. The bounded budget caps the worst-case wait
//! per call, so a stuck upstream never wedges a job.

use crate::config::{backoff_delay, MAX_RETRIES};
use crate::fetcher::{FetcherError, FetcherResult};
use std::future::Future;
use tracing::{debug, warn};

/// Run `operation` until it succeeds, fails non-retriably, or exhausts
/// [`MAX_RETRIES`] attempts.
///
/// Exhaustion surfaces [`FetcherError::RetriesExhausted`] carrying the final
/// failure observed.
pub async fn fetch_with_retry<T, F, Fut>(mut operation: F) -> FetcherResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetcherResult<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "upstream call recovered");
                }
                return Ok(value);
            }
            Err(error) if error.is_retriable() => {
                attempt += 1;
                if attempt >= MAX_RETRIES {
                    warn!(
                        attempts = attempt,
                        error = %error,
                        "upstream call failed permanently"
                    );
                    return Err(FetcherError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(error),
                    });
                }
                let delay = backoff_delay(attempt - 1);
                warn!(
                    attempt = attempt,
                    max_attempts = MAX_RETRIES,
                    backoff_ms = delay.as_millis() as u64,
                    error = %error,
                    "upstream call failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
