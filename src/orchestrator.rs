//! Top-level driver for bulk analytics jobs.
//!
//! `submit` validates synchronously, registers a job, and spawns the
//! background body. The body walks workspaces in input order: list campaigns,
//! partition the range, schedule the `(campaign, window)` cross-product
//! through the batch scheduler, fold the results, publish the rollup.
//! Workspace and campaign failures are captured in-band; only a fault in the
//! orchestration itself fails the job.

use crate::aggregate::{
    aggregate_workspace, build_fetch_tasks, merge_daily_totals, WorkspaceRollup,
};
use crate::config::{ANALYTICS_WINDOW_DAYS, MAX_CONCURRENT_REQUESTS};
use crate::daterange::{partition_date_range, DateRangeError, DateWindow};
use crate::fetcher::CampaignAnalyticsClient;
use crate::job::{JobRecord, JobStatus, JobStore, JobStoreError};
use crate::scheduler;
use crate::shutdown::SharedShutdown;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Errors surfaced by [`JobOrchestrator::submit`] before any background work
/// starts. No job is registered when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The workspace list was empty.
    #[error("api_keys array cannot be empty")]
    EmptyWorkspaces,

    /// The end date precedes the start date.
    #[error("end_date {end} is before start_date {start}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
}

/// Faults in the orchestration body itself. Any of these moves the job to
/// `Failed`; per-workspace and per-campaign errors never do.
#[derive(Debug, thiserror::Error)]
enum OrchestrationError {
    #[error(transparent)]
    Store(#[from] JobStoreError),

    #[error(transparent)]
    Partition(#[from] DateRangeError),

    #[error("shutdown requested before the job finished")]
    Shutdown,
}

/// Composes partitioning, scheduling, fetching, and aggregation for one job
/// per [`submit`](JobOrchestrator::submit) call.
///
/// Cloning is cheap (shared handles only); the background body runs on a
/// clone so `submit` never blocks on upstream work.
#[derive(Clone)]
pub struct JobOrchestrator {
    store: JobStore,
    client: Arc<dyn CampaignAnalyticsClient>,
    max_concurrency: usize,
    window_days: u32,
    shutdown: Option<SharedShutdown>,
}

impl JobOrchestrator {
    /// Orchestrator with the default concurrency ceiling and window width.
    pub fn new(store: JobStore, client: Arc<dyn CampaignAnalyticsClient>) -> Self {
        Self {
            store,
            client,
            max_concurrency: MAX_CONCURRENT_REQUESTS,
            window_days: ANALYTICS_WINDOW_DAYS,
            shutdown: None,
        }
    }

    /// Override the number of concurrent fetches per wave.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Attach a shared shutdown handle so an abandoned job stops issuing new
    /// fetches once shutdown is requested.
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Validate and launch a job, returning its run id immediately.
    ///
    /// Validation failures surface synchronously and leave the store
    /// untouched.
    pub async fn submit(
        &self,
        workspaces: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Uuid, SubmitError> {
        if workspaces.is_empty() {
            return Err(SubmitError::EmptyWorkspaces);
        }
        if start > end {
            return Err(SubmitError::InvalidRange { start, end });
        }

        let id = self.store.create().await;
        info!(run_id = %id, workspaces = workspaces.len(), %start, %end, "bulk analytics job accepted");

        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run_job(id, workspaces, start, end).await;
        });
        Ok(id)
    }

    /// Background body: drives the job to a terminal state and never panics
    /// outwards.
    async fn run_job(&self, id: Uuid, workspaces: Vec<String>, start: NaiveDate, end: NaiveDate) {
        let span = tracing::info_span!("bulk_analytics_job", run_id = %id);
        let outcome = self
            .execute(id, &workspaces, start, end)
            .instrument(span)
            .await;

        if let Err(fault) = outcome {
            error!(run_id = %id, error = %fault, "bulk analytics job failed");
            // Best effort: the record may already be terminal.
            let _ = self
                .store
                .update(id, |job| {
                    job.status = JobStatus::Failed;
                    job.error = Some(fault.to_string());
                })
                .await;
        }
    }

    async fn execute(
        &self,
        id: Uuid,
        workspaces: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), OrchestrationError> {
        self.store
            .update(id, |job| job.status = JobStatus::Processing)
            .await?;

        let windows = partition_date_range(start, end, self.window_days)?;
        info!(windows = windows.len(), "partitioned date range");

        let total = workspaces.len();
        for (index, credential) in workspaces.iter().enumerate() {
            if self.shutdown_requested() {
                return Err(OrchestrationError::Shutdown);
            }

            let rollup = self.process_workspace(credential, &windows).await;
            let completion = JobRecord::completion_percent(index + 1, total);
            let credential_key = credential.clone();
            self.store
                .update(id, move |job| {
                    merge_daily_totals(&mut job.daily_totals, &mut job.total_sends, &rollup);
                    job.workspaces.insert(credential_key, rollup);
                    job.completion = completion;
                })
                .await?;
            info!(
                workspace = %mask_credential(credential),
                completion = completion,
                "workspace processed"
            );
        }

        self.store
            .update(id, |job| {
                job.status = JobStatus::Completed;
                job.completion = 100;
            })
            .await?;
        info!(run_id = %id, "bulk analytics job completed");
        Ok(())
    }

    /// Fetch and fold one workspace. All failures are captured inside the
    /// returned rollup.
    async fn process_workspace(&self, credential: &str, windows: &[DateWindow]) -> WorkspaceRollup {
        let campaign_ids = match self.client.list_campaign_ids(credential).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    workspace = %mask_credential(credential),
                    error = %err,
                    "campaign listing failed"
                );
                return WorkspaceRollup::listing_failed(&err);
            }
        };
        info!(
            workspace = %mask_credential(credential),
            campaigns = campaign_ids.len(),
            "listed campaigns"
        );

        let tasks = build_fetch_tasks(&campaign_ids, windows);
        let fetches: Vec<_> = tasks
            .iter()
            .map(|task| {
                let client = Arc::clone(&self.client);
                let credential = credential.to_string();
                let campaign_id = task.campaign_id.clone();
                let window = task.window;
                async move {
                    client
                        .fetch_daily_analytics(&credential, &campaign_id, window)
                        .await
                }
            })
            .collect();

        info!(tasks = tasks.len(), "scheduling analytics fetches");
        let results = scheduler::run_all(fetches, self.max_concurrency).await;
        aggregate_workspace(&tasks, results)
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|s| s.is_shutdown_requested())
            .unwrap_or(false)
    }
}

/// Last four characters of a credential, for log lines that must not leak
/// the key itself.
fn mask_credential(credential: &str) -> String {
    let tail: String = credential
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}
