//! Job record structure and lifecycle states.

use crate::aggregate::WorkspaceRollup;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Lifecycle of a bulk analytics job.
///
/// Transitions only move forward: `Pending -> Processing -> {Completed,
/// Failed}`. The terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Identifier allocated, background body not yet started.
    #[default]
    Pending,
    /// Background body running; partial results are visible.
    Processing,
    /// Every workspace processed; the record is immutable.
    Completed,
    /// Orchestration-level fault; the record is immutable.
    Failed,
}

impl JobStatus {
    /// Whether the job can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Position in the forward-only lifecycle, used by the store to refuse
    /// backwards transitions.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed => 2,
            JobStatus::Failed => 2,
        }
    }
}

/// State of one bulk analytics job, mutated only by the orchestrator task
/// that owns it and read by pollers as a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    /// Run identifier handed back to the submitter.
    pub id: Uuid,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Percent of workspaces processed, floored to an integer. Monotonically
    /// non-decreasing over the job's life.
    pub completion: u8,
    /// Per-workspace rollups keyed by workspace credential.
    #[serde(rename = "data")]
    pub workspaces: HashMap<String, WorkspaceRollup>,
    /// Combined per-day totals across every workspace, date-sorted.
    pub daily_totals: BTreeMap<NaiveDate, u64>,
    /// Combined sends across every workspace.
    pub total_sends: u64,
    /// Orchestration-level error; set only when `status` is `Failed`.
    pub error: Option<String>,
}

impl JobRecord {
    /// Fresh record in `Pending` with empty rollups.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            completion: 0,
            workspaces: HashMap::new(),
            daily_totals: BTreeMap::new(),
            total_sends: 0,
            error: None,
        }
    }

    /// Floored integer percentage for `processed` of `total` workspaces.
    pub fn completion_percent(processed: usize, total: usize) -> u8 {
        if total == 0 {
            100
        } else {
            ((processed.min(total) * 100) / total) as u8
        }
    }
}
