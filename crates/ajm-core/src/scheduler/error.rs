//! Scheduler error type.

use crate::api::ApiError;
use crate::job::JobError;
use crate::partition::DateWindow;

/// Errors surfaced to the caller of the scheduler. Transient job failures and
/// throttling never show up here; they are absorbed by restarts and waiting.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// `next_completed` called with nothing queued; check `is_done` first.
    #[error("job queue is empty")]
    EmptyQueue,
    /// The head job used up its restart budget.
    #[error("job for {window} failed permanently after {attempts} attempt(s)")]
    JobPermanentlyFailed { window: DateWindow, attempts: u32 },
    /// Submitting or restarting a job failed.
    #[error(transparent)]
    Job(#[from] JobError),
    #[error("throttle refresh failed")]
    Throttle(#[source] ApiError),
    #[error("status batch failed")]
    Batch(#[source] ApiError),
}
