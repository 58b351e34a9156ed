//! Unit tests for the bounded-concurrency batch scheduler.

use campaign_analytics_service::scheduler::run_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_never_exceeds_concurrency_ceiling() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..37)
        .map(|_| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .collect();

    let results = run_all(tasks, 10).await;
    assert_eq!(results.len(), 37);
    // Full waves saturate the ceiling exactly; nothing ever exceeds it.
    assert_eq!(peak.load(Ordering::SeqCst), 10);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_output_order_is_input_order_not_completion_order() {
    // Earlier tasks sleep longer, so later tasks in the same wave finish
    // first.
    let tasks: Vec<_> = (0..8u64)
        .map(|i| async move {
            tokio::time::sleep(Duration::from_millis(100 - i * 10)).await;
            i
        })
        .collect();

    let results = run_all(tasks, 4).await;
    assert_eq!(results, (0..8).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_failing_tasks_do_not_disturb_siblings() {
    let tasks: Vec<_> = (0..6u32)
        .map(|i| async move {
            if i % 2 == 0 {
                Err(format!("task {i} failed"))
            } else {
                Ok(i)
            }
        })
        .collect();

    let results = run_all(tasks, 2).await;
    assert_eq!(results.len(), 6);
    for (i, result) in results.iter().enumerate() {
        if i % 2 == 0 {
            assert_eq!(result.as_ref().unwrap_err(), &format!("task {i} failed"));
        } else {
            assert_eq!(*result.as_ref().unwrap(), i as u32);
        }
    }
}

#[tokio::test]
async fn test_fewer_tasks_than_ceiling_runs_single_wave() {
    let tasks: Vec<_> = (0..3u32).map(|i| async move { i + 1 }).collect();
    assert_eq!(run_all(tasks, 10).await, vec![1, 2, 3]);
}
