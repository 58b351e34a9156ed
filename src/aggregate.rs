//! Multi-level rollup of fetched day records.
//!
//! Raw `(campaign, window)` results fold additively into per-campaign daily
//! maps, then into workspace totals and job-level daily totals. The merge is
//! commutative per date, so the true completion order of concurrent fetches
//! never changes the final numbers. Additivity assumes the partitioner's
//! windows do not overlap.

use crate::daterange::DateWindow;
use crate::fetcher::{FetcherError, FetcherResult};
use crate::DayRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One `(campaign, window)` fetch to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    /// Campaign the window belongs to.
    pub campaign_id: String,
    /// Date window for the analytics call.
    pub window: DateWindow,
}

/// Build the `(campaign, window)` cross-product: every window for the first
/// campaign, then the second, and so on. The scheduler preserves this order
/// in its output, which keeps task-to-campaign attribution trivial.
pub fn build_fetch_tasks(campaign_ids: &[String], windows: &[DateWindow]) -> Vec<FetchTask> {
    let mut tasks = Vec::with_capacity(campaign_ids.len() * windows.len());
    for campaign_id in campaign_ids {
        for window in windows {
            tasks.push(FetchTask {
                campaign_id: campaign_id.clone(),
                window: *window,
            });
        }
    }
    tasks
}

/// Daily sends and totals for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignRollup {
    /// Per-day send counts, date-sorted.
    pub daily_sends: BTreeMap<NaiveDate, u64>,
    /// Sum of all values in `daily_sends`.
    pub total_sent: u64,
    /// First window failure observed for this campaign, if any. Windows that
    /// succeeded are still merged in, so partial daily sends survive.
    pub error: Option<String>,
}

/// Rollup across every campaign in one workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceRollup {
    /// Per-campaign rollups keyed by campaign id.
    #[serde(rename = "campaign_analytics")]
    pub campaigns: HashMap<String, CampaignRollup>,
    /// Sends across all campaigns in the workspace.
    pub total_sent: u64,
    /// Set only when campaign listing itself failed; per-campaign failures
    /// live inside [`CampaignRollup::error`].
    pub error: Option<String>,
}

impl WorkspaceRollup {
    /// Rollup for a workspace whose campaign listing failed outright.
    pub fn listing_failed(error: &FetcherError) -> Self {
        Self {
            error: Some(format!("Failed to fetch campaign IDs: {error}")),
            ..Self::default()
        }
    }
}

/// Fold the scheduler's results, parallel to `tasks`, into one workspace
/// rollup.
///
/// Every campaign in `tasks` appears in the output even if all of its windows
/// failed. Successful windows merge additively; the first failing window per
/// campaign is recorded as that campaign's error.
pub fn aggregate_workspace(
    tasks: &[FetchTask],
    results: Vec<FetcherResult<Vec<DayRecord>>>,
) -> WorkspaceRollup {
    debug_assert_eq!(tasks.len(), results.len(), "one result per task");

    let mut workspace = WorkspaceRollup::default();
    for task in tasks {
        workspace
            .campaigns
            .entry(task.campaign_id.clone())
            .or_default();
    }

    for (task, result) in tasks.iter().zip(results) {
        let Some(campaign) = workspace.campaigns.get_mut(&task.campaign_id) else {
            continue;
        };
        match result {
            Ok(days) => {
                for day in days {
                    *campaign.daily_sends.entry(day.date).or_insert(0) += day.sent;
                    campaign.total_sent += day.sent;
                    workspace.total_sent += day.sent;
                }
            }
            Err(error) => {
                if campaign.error.is_none() {
                    campaign.error = Some(format!("Failed to fetch analytics: {error}"));
                }
            }
        }
    }
    workspace
}

/// Merge one workspace's per-day sends into the job-level totals.
pub fn merge_daily_totals(
    daily_totals: &mut BTreeMap<NaiveDate, u64>,
    total_sends: &mut u64,
    workspace: &WorkspaceRollup,
) {
    for campaign in workspace.campaigns.values() {
        for (date, sent) in &campaign.daily_sends {
            *daily_totals.entry(*date).or_insert(0) += sent;
            *total_sends += sent;
        }
    }
}

/// Range summary for a single campaign: totals plus activity breakdown.
#[derive(Debug, Serialize)]
pub struct CampaignSummary {
    /// Sends across the whole range.
    pub total_sent: u64,
    /// Calendar days in the requested range.
    pub days_in_range: u64,
    /// Days with at least one send.
    pub active_days: u64,
    /// Days with no sends (including days absent from the upstream data).
    pub zero_days: u64,
    /// Day with the highest send count, if any sends happened at all.
    pub peak: Option<DayRecord>,
}

/// Summarize one campaign's day records over `[start, end]`. Days the
/// upstream did not report count as zero-send days.
pub fn summarize_campaign(start: NaiveDate, end: NaiveDate, days: &[DayRecord]) -> CampaignSummary {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for day in days {
        *by_date.entry(day.date).or_insert(0) += day.sent;
    }

    let days_in_range = (end - start).num_days() as u64 + 1;
    let total_sent: u64 = by_date.values().sum();
    let active_days = by_date.values().filter(|sent| **sent > 0).count() as u64;
    let peak = by_date
        .iter()
        .filter(|(_, sent)| **sent > 0)
        .max_by_key(|(_, sent)| **sent)
        .map(|(date, sent)| DayRecord {
            date: *date,
            sent: *sent,
        });

    CampaignSummary {
        total_sent,
        days_in_range,
        active_days,
        zero_days: days_in_range.saturating_sub(active_days),
        peak,
    }
}
