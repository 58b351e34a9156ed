//! Instantly API v2 client for campaign listing and daily analytics.
//!
//! Both operations authenticate with a per-workspace bearer token and are
//! wrapped in [`fetch_with_retry`], so callers see either a final value or a
//! terminal [`FetcherError`].

use crate::daterange::DateWindow;
use crate::fetcher::retry::fetch_with_retry;
use crate::fetcher::shared_resources::global_http_client;
use crate::fetcher::{CampaignAnalyticsClient, FetcherError, FetcherResult};
use crate::DayRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Production Instantly endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.instantly.ai";

const CAMPAIGNS_PATH: &str = "/api/v2/campaigns";
const ANALYTICS_PATH: &str = "/api/v2/campaigns/analytics/daily";

/// Page size for campaign listing (upstream maximum).
const LIST_PAGE_LIMIT: u32 = 100;
/// Hard cap on listing pages; guards against a cursor that stops advancing.
const MAX_LIST_PAGES: usize = 1_000;

/// HTTP client for the two Instantly operations the orchestrator consumes.
pub struct InstantlyClient {
    client: Arc<Client>,
    base_url: String,
}

impl InstantlyClient {
    /// Client against the production endpoint, using the shared HTTP client.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternative endpoint (tests point this at a mock
    /// server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: global_http_client(),
            base_url: base_url.into(),
        }
    }

    /// Execute one GET request and map the response onto the error taxonomy:
    /// 429 → `RateLimited`, 5xx/network → `Transport`, other 4xx → `Api`,
    /// body mismatch → `Parse`.
    async fn get_json<T>(
        &self,
        path: &str,
        credential: &str,
        params: &[(&str, String)],
    ) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, params = params.len(), "upstream GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .query(params)
            .send()
            .await
            .map_err(|e| FetcherError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetcherError::RateLimited);
        }
        if status.is_server_error() {
            return Err(FetcherError::Transport(format!("server error: {status}")));
        }
        if status.is_client_error() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FetcherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetcherError::Parse(e.to_string()))
    }
}

impl Default for InstantlyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of the campaign listing endpoint.
#[derive(Debug, Deserialize)]
struct CampaignPage {
    #[serde(default)]
    items: Vec<CampaignItem>,
    next_starting_after: Option<String>,
}

/// Listing item; rows without an id are skipped.
#[derive(Debug, Deserialize)]
struct CampaignItem {
    id: Option<String>,
}

#[async_trait]
impl CampaignAnalyticsClient for InstantlyClient {
    async fn list_campaign_ids(&self, credential: &str) -> FetcherResult<Vec<String>> {
        let mut campaign_ids = Vec::new();
        let mut starting_after: Option<String> = None;

        for page_index in 0..MAX_LIST_PAGES {
            let mut params = vec![("limit", LIST_PAGE_LIMIT.to_string())];
            if let Some(cursor) = &starting_after {
                params.push(("starting_after", cursor.clone()));
            }

            let params: &[(&str, String)] = &params;
            let page: CampaignPage =
                fetch_with_retry(|| self.get_json(CAMPAIGNS_PATH, credential, params)).await?;

            let page_was_empty = page.items.is_empty();
            campaign_ids.extend(page.items.into_iter().filter_map(|item| item.id));
            debug!(
                page = page_index + 1,
                total = campaign_ids.len(),
                "campaign listing page received"
            );

            match page.next_starting_after {
                Some(cursor) if !page_was_empty => starting_after = Some(cursor),
                _ => return Ok(campaign_ids),
            }
        }

        Err(FetcherError::Pagination(format!(
            "campaign listing did not terminate after {MAX_LIST_PAGES} pages"
        )))
    }

    async fn fetch_daily_analytics(
        &self,
        credential: &str,
        campaign_id: &str,
        window: DateWindow,
    ) -> FetcherResult<Vec<DayRecord>> {
        let params = [
            ("campaign_id", campaign_id.to_string()),
            ("start_date", window.start.to_string()),
            ("end_date", window.end.to_string()),
        ];
        let params: &[(&str, String)] = &params;
        fetch_with_retry(|| self.get_json(ANALYTICS_PATH, credential, params)).await
    }
}
