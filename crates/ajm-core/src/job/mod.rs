//! One remote async job bound to a date window.
//!
//! A [`Job`] owns the local state machine (`Pending → Running → Completed |
//! Failed`, with `Failed → Running` on restart); the remote side is reached
//! through the [`crate::api`] traits.

mod error;
mod params;
mod state;

pub use error::JobError;
pub use params::{merge_params, JobParams, TIME_RANGE_KEY};
pub use state::JobState;

use crate::api::{JobSubmitter, RunId, StatusBatch, StatusReport};
use crate::partition::DateWindow;

#[derive(Debug, Clone)]
pub struct Job {
    window: DateWindow,
    params: JobParams,
    state: JobState,
    /// Number of submissions so far (1 after `start`, +1 per restart).
    attempts: u32,
    run_id: Option<RunId>,
}

impl Job {
    /// New pending job for `window` with fully merged request parameters.
    pub fn new(window: DateWindow, params: JobParams) -> Self {
        Self {
            window,
            params,
            state: JobState::Pending,
            attempts: 0,
            run_id: None,
        }
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn params(&self) -> &JobParams {
        &self.params
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Id of the current remote run, once submitted.
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn completed(&self) -> bool {
        self.state == JobState::Completed
    }

    pub fn failed(&self) -> bool {
        self.state == JobState::Failed
    }

    pub fn is_running(&self) -> bool {
        self.state == JobState::Running
    }

    /// Submit the window as a new remote run. Only valid from `Pending`.
    pub fn start<S: JobSubmitter + ?Sized>(&mut self, api: &mut S) -> Result<(), JobError> {
        if self.state != JobState::Pending {
            return Err(self.invalid("start"));
        }
        self.submit(api)?;
        tracing::debug!(window = %self.window, run = ?self.run_id, "job started");
        Ok(())
    }

    /// Re-submit the same window as a new run. Only valid from `Failed`.
    pub fn restart<S: JobSubmitter + ?Sized>(&mut self, api: &mut S) -> Result<(), JobError> {
        if self.state != JobState::Failed {
            return Err(self.invalid("restart"));
        }
        self.submit(api)?;
        tracing::debug!(
            window = %self.window,
            run = ?self.run_id,
            attempts = self.attempts,
            "job restarted"
        );
        Ok(())
    }

    fn submit<S: JobSubmitter + ?Sized>(&mut self, api: &mut S) -> Result<(), JobError> {
        let run_id = api
            .submit(&self.window, &self.params)
            .map_err(|source| JobError::Submit {
                window: self.window,
                source,
            })?;
        self.run_id = Some(run_id);
        self.attempts += 1;
        self.state = JobState::Running;
        Ok(())
    }

    /// Queue a status check for the current run. Only running jobs have
    /// anything to learn, so finished jobs add nothing.
    pub fn enqueue_status_refresh(&self, batch: &mut StatusBatch) {
        if let (JobState::Running, Some(run_id)) = (self.state, &self.run_id) {
            batch.push(run_id.clone());
        }
    }

    /// Take the status reported for the current run, if the report has one.
    pub fn apply_status(&mut self, report: &StatusReport) {
        if self.state != JobState::Running {
            return;
        }
        let Some(status) = self.run_id.as_ref().and_then(|id| report.get(id)) else {
            return;
        };
        self.state = JobState::from_remote(status);
    }

    fn invalid(&self, action: &'static str) -> JobError {
        JobError::InvalidTransition {
            window: self.window,
            from: self.state,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, RemoteStatus};
    use chrono::NaiveDate;

    #[derive(Default)]
    struct CountingSubmitter {
        submitted: u32,
        reject: bool,
    }

    impl JobSubmitter for CountingSubmitter {
        fn submit(&mut self, _: &DateWindow, _: &JobParams) -> Result<RunId, ApiError> {
            if self.reject {
                return Err(ApiError::Rejected("quota".into()));
            }
            self.submitted += 1;
            Ok(RunId::new(format!("run-{}", self.submitted)))
        }
    }

    fn window() -> DateWindow {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        DateWindow {
            since: day,
            until: day,
        }
    }

    fn report(run: &str, status: RemoteStatus) -> StatusReport {
        let mut r = StatusReport::default();
        r.extend([(RunId::new(run), status)]);
        r
    }

    #[test]
    fn start_poll_complete() {
        let mut api = CountingSubmitter::default();
        let mut job = Job::new(window(), JobParams::new());
        assert_eq!(job.state(), JobState::Pending);

        job.start(&mut api).unwrap();
        assert!(job.is_running());
        assert_eq!(job.attempts(), 1);

        let mut batch = StatusBatch::new();
        job.enqueue_status_refresh(&mut batch);
        assert_eq!(batch.requests(), &[RunId::new("run-1")]);

        job.apply_status(&report("run-1", RemoteStatus::Running));
        assert!(job.is_running());
        job.apply_status(&report("run-1", RemoteStatus::Completed));
        assert!(job.completed());
        assert!(!job.failed());

        let mut batch = StatusBatch::new();
        job.enqueue_status_refresh(&mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn restart_uses_new_run_and_ignores_stale_status() {
        let mut api = CountingSubmitter::default();
        let mut job = Job::new(window(), JobParams::new());
        job.start(&mut api).unwrap();
        job.apply_status(&report("run-1", RemoteStatus::Failed));
        assert!(job.failed());

        job.restart(&mut api).unwrap();
        assert_eq!(job.attempts(), 2);
        assert_eq!(job.run_id(), Some(&RunId::new("run-2")));

        // Status of the old run no longer applies.
        job.apply_status(&report("run-1", RemoteStatus::Failed));
        assert!(job.is_running());
    }

    #[test]
    fn invalid_transitions_rejected() {
        let mut api = CountingSubmitter::default();
        let mut job = Job::new(window(), JobParams::new());
        assert!(matches!(
            job.restart(&mut api),
            Err(JobError::InvalidTransition { action: "restart", from: JobState::Pending, .. })
        ));
        job.start(&mut api).unwrap();
        assert!(matches!(
            job.start(&mut api),
            Err(JobError::InvalidTransition { action: "start", .. })
        ));
        assert_eq!(api.submitted, 1);
    }

    #[test]
    fn submit_failure_leaves_job_pending() {
        let mut api = CountingSubmitter {
            reject: true,
            ..Default::default()
        };
        let mut job = Job::new(window(), JobParams::new());
        let err = job.start(&mut api).unwrap_err();
        assert!(matches!(err, JobError::Submit { .. }));
        assert_eq!(job.state(), JobState::Pending);
        assert_eq!(job.attempts(), 0);
    }
}
