//! HTTP handlers for job submission, polling, and health.

use crate::server::models::{
    BulkAnalyticsRequest, ErrorResponse, HealthResponse, JobAccepted, JobStatusResponse,
};
use crate::server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Job not found")),
    )
        .into_response()
}

fn parse_date(value: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| bad_request("Invalid date format. Use YYYY-MM-DD"))
}

/// `POST /analytics/bulk/start` - validate and launch a bulk analytics job.
///
/// Every validation failure answers `400` before a job is registered, so a
/// rejected submission never produces a run id.
pub async fn start_bulk_analytics(
    State(state): State<AppState>,
    request: Result<Json<BulkAnalyticsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "rejected malformed submission");
            return bad_request(rejection.body_text());
        }
    };

    let start = match parse_date(&request.start_date) {
        Ok(date) => date,
        Err(response) => return response,
    };
    let end = match parse_date(&request.end_date) {
        Ok(date) => date,
        Err(response) => return response,
    };

    match state.orchestrator.submit(request.api_keys, start, end).await {
        Ok(run_id) => (StatusCode::ACCEPTED, Json(JobAccepted::new(run_id))).into_response(),
        Err(err) => {
            warn!(error = %err, "rejected invalid submission");
            bad_request(err.to_string())
        }
    }
}

/// `GET /analytics/bulk/status/{run_id}` - snapshot of a job's progress.
///
/// A malformed or unknown id answers `404`; otherwise the current record
/// snapshot is rendered, including results once the job completed.
pub async fn job_status(State(state): State<AppState>, Path(run_id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&run_id) else {
        return not_found();
    };
    match state.store.get(id).await {
        Some(job) => {
            info!(run_id = %id, status = ?job.status, completion = job.completion, "status polled");
            Json(JobStatusResponse::from(job.as_ref())).into_response()
        }
        None => not_found(),
    }
}

/// `GET /health` - liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
}
