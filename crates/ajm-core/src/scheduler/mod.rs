//! Throttle-aware scheduler for date-windowed async jobs.
//!
//! Keeps a bounded FIFO of submitted jobs covering `[from, to]`, admits new
//! windows only while throttle pressure allows, polls a prefix of the queue in
//! one status batch, restarts failures, and hands completed jobs out strictly
//! in window order. Single-threaded and poll-driven; waits go through a
//! [`Sleeper`].
//!
//! Typical use:
//!
//! ```no_run
//! # use ajm_core::scheduler::Scheduler;
//! # fn drive<A: ajm_core::api::AsyncJobApi>(mut scheduler: Scheduler<A>) -> Result<(), ajm_core::scheduler::SchedulerError> {
//! scheduler.add_more_jobs()?;
//! while !scheduler.is_done() {
//!     let job = scheduler.next_completed()?;
//!     println!("{} ready", job.window());
//! }
//! # Ok(())
//! # }
//! ```

mod admission;
mod drain;
mod error;
mod poll;
mod queue;

pub use error::SchedulerError;
pub use queue::JobQueue;

use chrono::NaiveDate;

use crate::api::{AsyncJobApi, ThrottlePressure};
use crate::clock::{Sleeper, ThreadSleeper};
use crate::config::SchedulerConfig;
use crate::job::{Job, JobParams};
use crate::partition::RangePartitioner;
use crate::retry::RestartPolicy;

use drain::Drained;

pub struct Scheduler<A, S = ThreadSleeper> {
    api: A,
    sleeper: S,
    config: SchedulerConfig,
    restart_policy: RestartPolicy,
    partitioner: RangePartitioner,
    job_template: JobParams,
    queue: JobQueue,
    throttle_snapshot: ThrottlePressure,
}

impl<A: AsyncJobApi> Scheduler<A> {
    /// Scheduler for `[from, to]` that sleeps on the calling thread between polls.
    pub fn new(
        api: A,
        config: SchedulerConfig,
        from: NaiveDate,
        to: NaiveDate,
        job_template: JobParams,
    ) -> Self {
        Self::with_sleeper(api, ThreadSleeper, config, from, to, job_template)
    }
}

impl<A: AsyncJobApi, S: Sleeper> Scheduler<A, S> {
    pub fn with_sleeper(
        api: A,
        sleeper: S,
        config: SchedulerConfig,
        from: NaiveDate,
        to: NaiveDate,
        job_template: JobParams,
    ) -> Self {
        tracing::debug!(?config, %from, %to, "Scheduler::new");
        let partitioner = RangePartitioner::new(from, to, config.window_size_days);
        Self {
            api,
            sleeper,
            restart_policy: config.restart_policy(),
            config,
            partitioner,
            job_template,
            queue: JobQueue::new(),
            throttle_snapshot: ThrottlePressure::default(),
        }
    }

    /// Submit as many new windows as throttle and the in-flight cap allow.
    /// Blocks while throttle is above the limit. Returns the number of jobs added.
    pub fn add_more_jobs(&mut self) -> Result<usize, SchedulerError> {
        self.top_up()
    }

    /// True once every window has been handed out.
    pub fn is_done(&self) -> bool {
        self.queue.is_empty() && !self.partitioner.has_remaining()
    }

    /// Wait for the oldest queued job to complete and return it, restarting
    /// it on failure. Jobs come out in window order.
    ///
    /// Fails with [`SchedulerError::EmptyQueue`] when nothing is queued. That
    /// includes a top-up that admitted nothing because throttle sat exactly
    /// at the limit; [`Scheduler::completed_jobs`] waits that out instead.
    pub fn next_completed(&mut self) -> Result<Job, SchedulerError> {
        match self.drain_head()? {
            Drained::Completed(job) => Ok(job),
            Drained::PermanentFailure { window, attempts } => {
                tracing::warn!(%window, attempts, "job failed permanently");
                Err(SchedulerError::JobPermanentlyFailed { window, attempts })
            }
        }
    }

    /// Iterator over completed jobs until done; stops after the first error.
    /// An empty queue is topped up, sleeping between passes until a job is
    /// admitted.
    pub fn completed_jobs(&mut self) -> CompletedJobs<'_, A, S> {
        CompletedJobs {
            scheduler: self,
            failed: false,
        }
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// Queued jobs not yet completed.
    pub fn in_flight(&self) -> usize {
        self.queue.in_flight()
    }

    /// Start of the next window to be submitted, if any remain.
    pub fn cursor(&self) -> Option<NaiveDate> {
        self.partitioner
            .cursor()
            .filter(|_| self.partitioner.has_remaining())
    }

    /// Throttle pair as of the last read.
    pub fn throttle_snapshot(&self) -> ThrottlePressure {
        self.throttle_snapshot
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}

/// Completed jobs in window order; see [`Scheduler::completed_jobs`].
pub struct CompletedJobs<'a, A, S> {
    scheduler: &'a mut Scheduler<A, S>,
    failed: bool,
}

impl<A: AsyncJobApi, S: Sleeper> Iterator for CompletedJobs<'_, A, S> {
    type Item = Result<Job, SchedulerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.scheduler.is_done() {
            return None;
        }
        if self.scheduler.queue.is_empty() {
            if let Err(e) = self.scheduler.top_up_until_queued() {
                self.failed = true;
                return Some(Err(e));
            }
        }
        let item = self.scheduler.next_completed();
        self.failed = item.is_err();
        Some(item)
    }
}
