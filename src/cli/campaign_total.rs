//! `campaign-total` command: one-shot send summary for a single campaign.

use crate::aggregate::summarize_campaign;
use crate::cli::CliError;
use crate::config::ANALYTICS_WINDOW_DAYS;
use crate::daterange::partition_date_range;
use crate::fetcher::instantly::InstantlyClient;
use crate::fetcher::CampaignAnalyticsClient;
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

/// Arguments for the `campaign-total` command
#[derive(Debug, Args)]
pub struct CampaignTotalArgs {
    /// Workspace API key
    #[arg(long, env = "INSTANTLY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Campaign UUID
    #[arg(long)]
    pub campaign_id: String,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,

    /// Last day of the range (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub end_date: String,
}

impl CampaignTotalArgs {
    /// Fetch the range window by window and print a JSON summary.
    pub async fn execute(&self) -> Result<(), CliError> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;

        let windows = partition_date_range(start, end, ANALYTICS_WINDOW_DAYS)?;
        info!(
            campaign_id = %self.campaign_id,
            windows = windows.len(),
            "fetching campaign analytics"
        );

        let client = InstantlyClient::new();
        let mut days = Vec::new();
        for window in windows {
            days.extend(
                client
                    .fetch_daily_analytics(&self.api_key, &self.campaign_id, window)
                    .await?,
            );
        }

        let summary = summarize_campaign(start, end, &days);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| CliError::InvalidArgument(format!("invalid date '{value}': {e}")))
}
