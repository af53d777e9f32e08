//! Date window type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous, inclusive date range `[since, until]` covered by one job.
///
/// Serializes as `{"since": "YYYY-MM-DD", "until": "YYYY-MM-DD"}`, which is
/// the shape merged into job request parameters as `time_range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day (inclusive).
    pub since: NaiveDate,
    /// Last day (inclusive).
    pub until: NaiveDate,
}

impl DateWindow {
    /// Number of days covered (always at least 1 for a well-formed window).
    pub fn days(&self) -> i64 {
        (self.until - self.since).num_days() + 1
    }

    /// True if `date` falls inside this window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since <= date && date <= self.until
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}]",
            self.since.format("%Y-%m-%d"),
            self.until.format("%Y-%m-%d")
        )
    }
}
