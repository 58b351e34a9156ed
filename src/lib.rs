//! # Campaign Analytics Service
//!
//! A service for bulk acquisition of per-campaign daily send analytics from
//! the Instantly email platform, across multiple tenant workspaces and an
//! arbitrary date range, rolled up into per-campaign, per-workspace, and
//! global daily totals.
//!
//! ## Features
//!
//! - **Windowed Fetching**: Long date ranges are split into the 7-day windows
//!   the upstream analytics endpoint accepts
//! - **Retry with Backoff**: Transient failures and 429 responses are retried
//!   with exponential backoff and jitter
//! - **Bounded Concurrency**: Fetches run in waves with a hard ceiling so the
//!   upstream rate limit is never stampeded
//! - **Asynchronous Jobs**: Submissions return a run id immediately; progress
//!   and results are polled through the HTTP status endpoint
//! - **Failure Isolation**: A bad credential or a failing campaign never
//!   aborts the rest of the job
//!
//! ## Quick Start
//!
//! ```no_run
//! use campaign_analytics_service::fetcher::instantly::InstantlyClient;
//! use campaign_analytics_service::{JobOrchestrator, JobStore};
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JobStore::new();
//! let client = Arc::new(InstantlyClient::new());
//! let orchestrator = Arc::new(JobOrchestrator::new(store.clone(), client));
//!
//! let run_id = orchestrator
//!     .submit(
//!         vec!["workspace-api-key".to_string()],
//!         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
//!     )
//!     .await?;
//!
//! // Poll for progress; the record snapshot is always internally consistent.
//! let snapshot = store.get(run_id).await;
//! # let _ = snapshot;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several core modules:
//!
//! - [`daterange`] - Date-range partitioning into bounded fetch windows
//! - [`fetcher`] - Upstream Instantly API client with retry/backoff
//! - [`scheduler`] - Bounded-concurrency batch execution
//! - [`aggregate`] - Multi-level rollup of fetched day records
//! - [`job`] - Job records, lifecycle states, and the in-memory store
//! - [`orchestrator`] - Top-level driver composing the above per job
//! - [`server`] - HTTP surface (start / status / health)

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Multi-level rollup of fetched day records
pub mod aggregate;
/// CLI command implementations
pub mod cli;
/// Fetch tuning constants and backoff calculation
pub mod config;
/// Date-range partitioning
pub mod daterange;
/// Upstream API clients
pub mod fetcher;
/// Job records, states, and store
pub mod job;
/// Top-level job driver
pub mod orchestrator;
/// Bounded-concurrency batch scheduler
pub mod scheduler;
/// HTTP surface
pub mod server;
/// Graceful shutdown coordination
pub mod shutdown;

pub use daterange::{partition_date_range, DateRangeError, DateWindow};
pub use fetcher::{CampaignAnalyticsClient, FetcherError, FetcherResult};
pub use job::{JobRecord, JobStatus, JobStore};
pub use orchestrator::{JobOrchestrator, SubmitError};

/// One day of send analytics for a campaign, as returned by the upstream
/// daily-analytics endpoint. Upstream rows carry more counters than we need;
/// everything beyond the date and the send count is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Calendar day the count applies to.
    pub date: NaiveDate,
    /// Number of emails sent on that day.
    pub sent: u64,
}
