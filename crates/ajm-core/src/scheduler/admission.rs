//! Throttle-gated submission of new windows.

use crate::api::AsyncJobApi;
use crate::clock::Sleeper;
use crate::job::{merge_params, Job};

use super::{Scheduler, SchedulerError};

impl<A: AsyncJobApi, S: Sleeper> Scheduler<A, S> {
    /// Submit new windows until throttle reaches the limit, the range runs
    /// out, or `max_in_flight` unfinished jobs are queued.
    pub(super) fn top_up(&mut self) -> Result<usize, SchedulerError> {
        if !self.partitioner.has_remaining() {
            return Ok(0);
        }
        self.refresh_throttle()?;
        self.wait_for_throttle()?;

        let limit = self.config.throttle_limit;
        let before = self.queue.len();
        while self.throttle_snapshot.effective() < limit
            && self.partitioner.has_remaining()
            && self.queue.in_flight() < self.config.max_in_flight
        {
            let Some(window) = self.partitioner.next_window() else {
                break;
            };
            let params = merge_params(&self.job_template, &window);
            let mut job = Job::new(window, params);
            if let Err(e) = job.start(&mut self.api) {
                self.partitioner.give_back(window);
                return Err(e.into());
            }
            self.queue.push_back(job);
            self.throttle_snapshot = self.api.current_pressure();
        }

        let added = self.queue.len() - before;
        tracing::info!(
            added,
            throttle = %self.throttle_snapshot,
            queued = self.queue.len(),
            in_flight = self.queue.in_flight(),
            "added {} job(s)",
            added
        );
        Ok(added)
    }

    /// Top up until at least one job is queued or the range is used up,
    /// sleeping one poll interval after each pass that admits nothing.
    pub(super) fn top_up_until_queued(&mut self) -> Result<(), SchedulerError> {
        let interval = self.config.poll_interval();
        self.top_up()?;
        while self.queue.is_empty() && self.partitioner.has_remaining() {
            tracing::info!(
                throttle = %self.throttle_snapshot,
                "nothing admitted, waiting {:?}",
                interval
            );
            self.sleeper.sleep(interval);
            self.top_up()?;
        }
        Ok(())
    }

    /// Block while effective throttle is above the limit, refreshing after
    /// each fixed-interval sleep.
    fn wait_for_throttle(&mut self) -> Result<(), SchedulerError> {
        let interval = self.config.poll_interval();
        while self.throttle_snapshot.effective() > self.config.throttle_limit {
            tracing::info!(
                throttle = %self.throttle_snapshot,
                limit = self.config.throttle_limit,
                "throttle above limit, waiting {:?}",
                interval
            );
            self.sleeper.sleep(interval);
            self.refresh_throttle()?;
        }
        Ok(())
    }

    fn refresh_throttle(&mut self) -> Result<(), SchedulerError> {
        self.api.refresh().map_err(SchedulerError::Throttle)?;
        self.throttle_snapshot = self.api.current_pressure();
        tracing::debug!(throttle = %self.throttle_snapshot, "throttle refreshed");
        Ok(())
    }
}
