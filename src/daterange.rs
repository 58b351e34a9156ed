//! Date-range partitioning for windowed analytics fetches.
//!
//! The upstream daily-analytics endpoint accepts at most a 7-day span per
//! call, so a long range is split into consecutive inclusive windows before
//! fetching. The additive merge in [`crate::aggregate`] relies on the windows
//! produced here being non-overlapping; tests assert that invariant directly.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date window accepted by a single upstream analytics call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day covered by the window.
    pub start: NaiveDate,
    /// Last day covered by the window (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Number of calendar days the window spans, counting both bounds.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Errors from range partitioning.
#[derive(Debug, thiserror::Error)]
pub enum DateRangeError {
    /// Start date lies after the end date.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start of the range.
        start: NaiveDate,
        /// Requested end of the range.
        end: NaiveDate,
    },
}

/// Split `[start, end]` into consecutive windows of at most `window_days`
/// calendar days.
///
/// Windows are inclusive, non-overlapping, ascending, and concatenate to
/// exactly the requested range; the final window is truncated to `end`.
/// `start == end` yields a single one-day window.
pub fn partition_date_range(
    start: NaiveDate,
    end: NaiveDate,
    window_days: u32,
) -> Result<Vec<DateWindow>, DateRangeError> {
    if start > end {
        return Err(DateRangeError::InvalidRange { start, end });
    }
    debug_assert!(window_days >= 1, "window must span at least one day");

    let mut windows = Vec::new();
    let mut current = start;
    loop {
        let span_end = current
            .checked_add_days(Days::new(u64::from(window_days.saturating_sub(1))))
            .unwrap_or(end)
            .min(end);
        windows.push(DateWindow {
            start: current,
            end: span_end,
        });
        if span_end >= end {
            break;
        }
        current = match span_end.succ_opt() {
            Some(next) => next,
            // End of the calendar; nothing left to cover.
            None => break,
        };
    }
    Ok(windows)
}
