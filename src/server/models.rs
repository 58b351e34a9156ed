//! Request and response bodies for the bulk analytics API.

use crate::aggregate::WorkspaceRollup;
use crate::job::{JobRecord, JobStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Body of `POST /analytics/bulk/start`.
#[derive(Debug, Deserialize)]
pub struct BulkAnalyticsRequest {
    /// One opaque API key per workspace to include in the job.
    pub api_keys: Vec<String>,
    /// First day of the range, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the range, `YYYY-MM-DD`, inclusive.
    pub end_date: String,
}

/// `202` body for an accepted job.
#[derive(Debug, Serialize)]
pub struct JobAccepted {
    /// Always `"accepted"`.
    pub status: &'static str,
    /// Identifier to poll the status endpoint with.
    pub run_id: Uuid,
    /// Human-readable confirmation.
    pub message: &'static str,
}

impl JobAccepted {
    /// Standard acceptance body for `run_id`.
    pub fn new(run_id: Uuid) -> Self {
        Self {
            status: "accepted",
            run_id,
            message: "Job started successfully",
        }
    }
}

/// Error envelope for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: &'static str,
    /// What went wrong.
    pub message: String,
}

impl ErrorResponse {
    /// Error envelope with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Body of `GET /analytics/bulk/status/{run_id}`.
///
/// While a job is in flight only `status` and `completion` are present; a
/// completed job adds the rollups and a failed job adds its error.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Integer percent of workspaces processed.
    pub completion: u8,
    /// Per-workspace rollups; present once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, WorkspaceRollup>>,
    /// Combined per-day totals, date-sorted; present once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_totals: Option<BTreeMap<NaiveDate, u64>>,
    /// Combined sends across every workspace; present once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sends: Option<u64>,
    /// Orchestration-level error; present when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&JobRecord> for JobStatusResponse {
    fn from(job: &JobRecord) -> Self {
        let mut response = Self {
            status: job.status,
            completion: job.completion,
            data: None,
            daily_totals: None,
            total_sends: None,
            error: None,
        };
        match job.status {
            JobStatus::Completed => {
                response.data = Some(job.workspaces.clone());
                response.daily_totals = Some(job.daily_totals.clone());
                response.total_sends = Some(job.total_sends);
            }
            JobStatus::Failed => {
                response.error = job.error.clone();
            }
            JobStatus::Pending | JobStatus::Processing => {}
        }
        response
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: &'static str,
    /// Server time in RFC 3339.
    pub timestamp: String,
}
