//! Waiting for the head job and handing it out.

use crate::api::AsyncJobApi;
use crate::clock::Sleeper;
use crate::job::Job;
use crate::partition::DateWindow;
use crate::retry::RestartDecision;

use super::{Scheduler, SchedulerError};

/// Outcome of draining the queue head.
#[derive(Debug)]
pub(super) enum Drained {
    Completed(Job),
    PermanentFailure { window: DateWindow, attempts: u32 },
}

impl<A: AsyncJobApi, S: Sleeper> Scheduler<A, S> {
    /// Poll until the head job finishes. A failed head is restarted while its
    /// attempt budget lasts; a completed head is popped, the queue is topped
    /// up, and the job is returned. If topping up fails the completed head
    /// stays queued, so a later call returns it.
    pub(super) fn drain_head(&mut self) -> Result<Drained, SchedulerError> {
        if self.queue.is_empty() {
            return Err(SchedulerError::EmptyQueue);
        }
        let interval = self.config.poll_interval();

        for _ in 0..self.restart_policy.max_attempts {
            self.poll_and_recover()?;
            while self.head()?.is_running() {
                tracing::info!(
                    window = %self.head()?.window(),
                    "job is not ready, waiting {:?}",
                    interval
                );
                self.sleeper.sleep(interval);
                self.poll_and_recover()?;
            }

            let policy = self.restart_policy;
            let head = self.queue.front_mut().ok_or(SchedulerError::EmptyQueue)?;
            if head.failed() {
                match policy.decide(head.attempts()) {
                    RestartDecision::Restart => {
                        tracing::info!(
                            window = %head.window(),
                            attempts = head.attempts(),
                            "job failed, restarting"
                        );
                        head.restart(&mut self.api)?;
                        continue;
                    }
                    RestartDecision::GiveUp => {
                        return Ok(Drained::PermanentFailure {
                            window: head.window(),
                            attempts: head.attempts(),
                        });
                    }
                }
            }

            let job = self.queue.pop_front().ok_or(SchedulerError::EmptyQueue)?;
            if let Err(e) = self.top_up() {
                self.queue.push_front(job);
                return Err(e);
            }
            tracing::debug!(window = %job.window(), attempts = job.attempts(), "job completed");
            return Ok(Drained::Completed(job));
        }

        // Each pass either returns or spends one attempt, so the budget is
        // gone by the time the loop ends.
        let head = self.head()?;
        Ok(Drained::PermanentFailure {
            window: head.window(),
            attempts: head.attempts(),
        })
    }

    fn head(&self) -> Result<&Job, SchedulerError> {
        self.queue.front().ok_or(SchedulerError::EmptyQueue)
    }
}
