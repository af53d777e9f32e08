//! Moving cursor over a date range and window planning.

use chrono::{Days, NaiveDate};

use super::window::DateWindow;

/// Hands out consecutive windows of `window_days` days covering `[from, to]`.
///
/// The cursor only moves forward. Once it passes `to` no further windows are
/// produced; the last window may be shorter than `window_days`.
#[derive(Debug, Clone)]
pub struct RangePartitioner {
    /// Start of the next unassigned window; `None` once the calendar runs out.
    cursor: Option<NaiveDate>,
    bound: NaiveDate,
    window_days: u32,
}

impl RangePartitioner {
    /// Create a partitioner for the inclusive range `[from, to]`.
    /// A `window_days` of 0 is treated as 1. An inverted range yields nothing.
    pub fn new(from: NaiveDate, to: NaiveDate, window_days: u32) -> Self {
        Self {
            cursor: Some(from),
            bound: to,
            window_days: window_days.max(1),
        }
    }

    /// Next unassigned window start (None once past the end of the calendar).
    pub fn cursor(&self) -> Option<NaiveDate> {
        self.cursor
    }

    /// Fixed inclusive upper bound of the whole range.
    pub fn bound(&self) -> NaiveDate {
        self.bound
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// True while at least one more window can be produced.
    pub fn has_remaining(&self) -> bool {
        self.cursor.is_some_and(|c| c <= self.bound)
    }

    /// Claim the next window and advance the cursor past it.
    pub fn next_window(&mut self) -> Option<DateWindow> {
        let since = self.cursor.filter(|c| *c <= self.bound)?;
        let until = since
            .checked_add_days(Days::new(u64::from(self.window_days) - 1))
            .map_or(self.bound, |u| u.min(self.bound));
        self.cursor = until.succ_opt();
        Some(DateWindow { since, until })
    }

    /// Undo the most recent `next_window`, so `window` is handed out again.
    pub fn give_back(&mut self, window: DateWindow) {
        debug_assert_eq!(
            self.cursor,
            window.until.succ_opt(),
            "only the last claimed window can be given back"
        );
        self.cursor = Some(window.since);
    }
}

impl Iterator for RangePartitioner {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        self.next_window()
    }
}

/// Builds the full window plan for `[from, to]` without scheduling anything.
///
/// Returns an empty vec if `from > to`.
pub fn plan_windows(from: NaiveDate, to: NaiveDate, window_days: u32) -> Vec<DateWindow> {
    RangePartitioner::new(from, to, window_days).collect()
}
