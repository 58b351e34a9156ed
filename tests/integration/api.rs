//! HTTP surface tests driven through the router with `tower::ServiceExt`.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use campaign_analytics_service::daterange::DateWindow;
use campaign_analytics_service::fetcher::{CampaignAnalyticsClient, FetcherResult};
use campaign_analytics_service::server::{create_router, AppState};
use campaign_analytics_service::{DayRecord, JobOrchestrator, JobStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

/// Upstream with one campaign that sent a single email per day.
struct OneCampaignClient;

#[async_trait]
impl CampaignAnalyticsClient for OneCampaignClient {
    async fn list_campaign_ids(&self, _credential: &str) -> FetcherResult<Vec<String>> {
        Ok(vec!["campaign-a".to_string()])
    }

    async fn fetch_daily_analytics(
        &self,
        _credential: &str,
        _campaign_id: &str,
        window: DateWindow,
    ) -> FetcherResult<Vec<DayRecord>> {
        let mut days = Vec::new();
        let mut current = window.start;
        while current <= window.end {
            days.push(DayRecord {
                date: current,
                sent: 1,
            });
            current = current.succ_opt().unwrap();
        }
        Ok(days)
    }
}

fn test_state() -> AppState {
    let store = JobStore::new();
    let orchestrator = Arc::new(JobOrchestrator::new(
        store.clone(),
        Arc::new(OneCampaignClient),
    ));
    AppState {
        orchestrator,
        store,
    }
}

fn start_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analytics/bulk/start")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn status_request(run_id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/analytics/bulk/status/{run_id}"))
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_returns_healthy() {
    let app = create_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().unwrap().starts_with("20"));
}

#[tokio::test]
async fn test_submission_is_accepted_and_completes() {
    let app = create_router(test_state());

    let response = app
        .clone()
        .oneshot(start_request(json!({
            "api_keys": ["workspace-key"],
            "start_date": "2025-01-01",
            "end_date": "2025-01-03",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = read_json(response).await;
    assert_eq!(body["status"], "accepted");
    let run_id = body["run_id"].as_str().unwrap().to_string();
    Uuid::parse_str(&run_id).expect("run_id is a uuid");

    // Poll until the background job finishes.
    let completed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let response = app
                .clone()
                .oneshot(status_request(&run_id))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = read_json(response).await;
            if body["status"] == "completed" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not complete in time");

    assert_eq!(completed["completion"], 100);
    assert_eq!(completed["total_sends"], 3);
    assert_eq!(completed["daily_totals"]["2025-01-02"], 1);
    let workspace = &completed["data"]["workspace-key"];
    assert_eq!(workspace["total_sent"], 3);
    assert_eq!(
        workspace["campaign_analytics"]["campaign-a"]["daily_sends"]["2025-01-01"],
        1
    );
}

#[tokio::test]
async fn test_reversed_dates_are_rejected_without_creating_a_job() {
    let state = test_state();
    let app = create_router(state.clone());

    let response = app
        .oneshot(start_request(json!({
            "api_keys": ["workspace-key"],
            "start_date": "2025-02-10",
            "end_date": "2025-02-01",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_dates_are_rejected() {
    let app = create_router(test_state());
    let response = app
        .oneshot(start_request(json!({
            "api_keys": ["workspace-key"],
            "start_date": "01/02/2025",
            "end_date": "2025-02-10",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid date format. Use YYYY-MM-DD");
}

#[tokio::test]
async fn test_empty_api_keys_are_rejected() {
    let app = create_router(test_state());
    let response = app
        .oneshot(start_request(json!({
            "api_keys": [],
            "start_date": "2025-01-01",
            "end_date": "2025-01-02",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "api_keys array cannot be empty");
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = create_router(test_state());
    let response = app
        .oneshot(start_request(json!({
            "api_keys": ["workspace-key"],
            "start_date": "2025-01-01",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_run_id_is_not_found() {
    let app = create_router(test_state());
    let response = app
        .oneshot(status_request(&Uuid::new_v4().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Job not found");
}

#[tokio::test]
async fn test_malformed_run_id_is_not_found() {
    let app = create_router(test_state());
    let response = app
        .oneshot(status_request("not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
