//! Batched status checks over the head of the queue, with early restarts.

use crate::api::{ApiError, AsyncJobApi, BatchExecutor, StatusBatch, StatusReport};
use crate::clock::Sleeper;
use crate::retry::RestartDecision;

use super::{Scheduler, SchedulerError};

impl<A: AsyncJobApi, S: Sleeper> Scheduler<A, S> {
    /// Refresh the status of the first `lookahead_count` jobs in one batch and
    /// restart any of them (except the head) that failed.
    ///
    /// The head's own failure is left to the drain loop.
    pub(super) fn poll_and_recover(&mut self) -> Result<(), SchedulerError> {
        let k = self.config.lookahead_count.max(1);

        let mut batch = StatusBatch::new();
        for job in self.queue.lookahead(k) {
            job.enqueue_status_refresh(&mut batch);
        }
        let report = run_status_batch(&mut self.api, batch).map_err(SchedulerError::Batch)?;
        for job in self.queue.lookahead_mut(k) {
            job.apply_status(&report);
        }

        let policy = self.restart_policy;
        for job in self.queue.lookahead_mut(k).skip(1) {
            if !job.failed() {
                continue;
            }
            match policy.decide(job.attempts()) {
                RestartDecision::Restart => {
                    tracing::info!(
                        window = %job.window(),
                        attempts = job.attempts(),
                        "queued job failed, restarting"
                    );
                    job.restart(&mut self.api)?;
                }
                RestartDecision::GiveUp => {
                    tracing::debug!(
                        window = %job.window(),
                        attempts = job.attempts(),
                        "queued job out of attempts, leaving failed"
                    );
                }
            }
        }
        Ok(())
    }
}

/// Execute `batch`, then any residual batch the executor hands back, until
/// every call has gone through. Returns the merged statuses.
pub fn run_status_batch<E: BatchExecutor + ?Sized>(
    executor: &mut E,
    batch: StatusBatch,
) -> Result<StatusReport, ApiError> {
    let mut report = StatusReport::default();
    let mut pending = Some(batch).filter(|b| !b.is_empty());
    let mut round_trips = 0u32;
    while let Some(batch) = pending {
        let response = executor.execute(batch)?;
        round_trips += 1;
        report.extend(response.statuses);
        pending = response.residual.filter(|b| !b.is_empty());
    }
    tracing::debug!(round_trips, statuses = report.len(), "status batch settled");
    Ok(report)
}
