//! Bounded-concurrency batch scheduler.
//!
//! Fetch tasks for one workspace run in sequential waves of at most
//! `max_concurrency` futures: wave *i+1* starts only after wave *i* has fully
//! resolved. This trades some parallelism for predictable upstream pressure
//! and simple progress accounting; the concurrency ceiling and the one-output-
//! per-task contract are what callers rely on.

use futures_util::future;
use std::future::Future;
use tracing::debug;

/// Run every task with at most `max_concurrency` in flight, returning outputs
/// in task input order.
///
/// Tasks that resolve to an error value do not affect their siblings; the
/// call returns only once every task has produced an output.
pub async fn run_all<Fut>(tasks: Vec<Fut>, max_concurrency: usize) -> Vec<Fut::Output>
where
    Fut: Future,
{
    let max_concurrency = max_concurrency.max(1);
    let total = tasks.len();
    let wave_count = total.div_ceil(max_concurrency);

    let mut results = Vec::with_capacity(total);
    let mut remaining = tasks.into_iter().peekable();
    let mut wave = 0;
    while remaining.peek().is_some() {
        let batch: Vec<Fut> = remaining.by_ref().take(max_concurrency).collect();
        wave += 1;
        debug!(
            wave = wave,
            waves = wave_count,
            size = batch.len(),
            "running fetch wave"
        );
        results.extend(future::join_all(batch).await);
    }
    results
}
