//! Upstream API clients and the retrying fetch primitive.

use crate::daterange::DateWindow;
use crate::DayRecord;
use async_trait::async_trait;

pub mod instantly;
pub mod retry;
pub mod shared_resources;

/// Fetcher errors.
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Upstream answered 429.
    #[error("rate limited by upstream")]
    RateLimited,

    /// Network-level failure or a 5xx response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-retriable upstream rejection (4xx other than 429).
    #[error("upstream error {status}: {message}")]
    Api {
        /// HTTP status code returned by the upstream API.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Upstream paging contract violated (cursor failed to terminate).
    #[error("pagination error: {0}")]
    Pagination(String),

    /// Retry budget exhausted; `last` is the final failure observed.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts performed before giving up.
        attempts: u32,
        /// The failure from the final attempt.
        last: Box<FetcherError>,
    },
}

impl FetcherError {
    /// Whether another attempt may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, FetcherError::RateLimited | FetcherError::Transport(_))
    }
}

/// Result type for fetcher operations.
pub type FetcherResult<T> = Result<T, FetcherError>;

/// The two upstream operations the orchestrator consumes.
///
/// Implemented by [`instantly::InstantlyClient`] for production; tests
/// substitute scripted implementations.
#[async_trait]
pub trait CampaignAnalyticsClient: Send + Sync {
    /// List every campaign id in the workspace identified by `credential`.
    async fn list_campaign_ids(&self, credential: &str) -> FetcherResult<Vec<String>>;

    /// Fetch per-day send analytics for one campaign inside `window`.
    ///
    /// `window` bounds are inclusive and must span at most
    /// [`crate::config::ANALYTICS_WINDOW_DAYS`] days, which the partitioner
    /// guarantees.
    async fn fetch_daily_analytics(
        &self,
        credential: &str,
        campaign_id: &str,
        window: DateWindow,
    ) -> FetcherResult<Vec<DayRecord>>;
}
