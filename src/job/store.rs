//! Process-wide registry of job records.
//!
//! One orchestrator task owns all writes for a given job; pollers read
//! concurrently. Updates clone the current record, apply the mutation, and
//! swap the `Arc` in wholesale, so a reader holding a snapshot never observes
//! a half-applied mutation. Entries live for the life of the process.

use super::record::{JobRecord, JobStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    /// No record under the given id.
    #[error("job {0} not found")]
    NotFound(Uuid),
}

/// Cloneable handle to the in-memory job registry.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, Arc<JobRecord>>>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh job id with a `Pending` record.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let record = Arc::new(JobRecord::new(id));
        self.jobs.write().await.insert(id, record);
        id
    }

    /// Snapshot of the record under `id`, if any.
    pub async fn get(&self, id: Uuid) -> Option<Arc<JobRecord>> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Number of records currently registered.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Apply `mutate` to the record under `id` and publish the result as a
    /// new snapshot.
    ///
    /// The store enforces the lifecycle invariants regardless of what the
    /// mutation does: terminal records are left untouched, `completion` never
    /// decreases, and `status` never moves backwards.
    pub async fn update<F>(&self, id: Uuid, mutate: F) -> Result<(), JobStoreError>
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut jobs = self.jobs.write().await;
        let slot = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;

        let previous = slot.as_ref();
        if previous.status.is_terminal() {
            warn!(job_id = %id, status = ?previous.status, "ignoring update to terminal job");
            return Ok(());
        }

        let mut next = previous.clone();
        mutate(&mut next);
        next.completion = next.completion.max(previous.completion).min(100);
        if next.status.rank() < previous.status.rank() {
            next.status = previous.status;
        }
        *slot = Arc::new(next);
        Ok(())
    }
}
