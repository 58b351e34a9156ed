//! Unit tests for the retrying fetch primitive.
//!
//! Paused tokio time makes the backoff sleeps free, so the full retry budget
//! can be exercised without slowing the suite.

use campaign_analytics_service::fetcher::retry::fetch_with_retry;
use campaign_analytics_service::fetcher::FetcherError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn test_immediate_success_makes_one_call() {
    let calls = Arc::new(AtomicU32::new(0));
    let result = fetch_with_retry(|| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FetcherError>("payload")
        }
    })
    .await;

    assert_eq!(result.unwrap(), "payload");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_transient_failures() {
    // Three failures then success: exactly four calls, result returned.
    let calls = Arc::new(AtomicU32::new(0));
    let result = fetch_with_retry(|| {
        let calls = calls.clone();
        async move {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            if attempt < 3 {
                Err(FetcherError::RateLimited)
            } else {
                Ok(42u64)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_failure_exhausts_budget_after_five_calls() {
    let calls = Arc::new(AtomicU32::new(0));
    let result: Result<(), _> = fetch_with_retry(|| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetcherError::Transport("connection refused".to_string()))
        }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    match result.unwrap_err() {
        FetcherError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 5);
            assert!(matches!(*last, FetcherError::Transport(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_and_transport_share_one_budget() {
    // Mixed retriable failures still cap at five total attempts.
    let calls = Arc::new(AtomicU32::new(0));
    let result: Result<(), _> = fetch_with_retry(|| {
        let calls = calls.clone();
        async move {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            if attempt % 2 == 0 {
                Err(FetcherError::RateLimited)
            } else {
                Err(FetcherError::Transport("reset".to_string()))
            }
        }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert!(matches!(
        result.unwrap_err(),
        FetcherError::RetriesExhausted { attempts: 5, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_non_retriable_failure_surfaces_immediately() {
    let calls = Arc::new(AtomicU32::new(0));
    let result: Result<(), _> = fetch_with_retry(|| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetcherError::Api {
                status: 401,
                message: "unauthorized".to_string(),
            })
        }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        result.unwrap_err(),
        FetcherError::Api { status: 401, .. }
    ));
}
