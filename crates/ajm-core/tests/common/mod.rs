//! Scripted backend for scheduler integration tests.

use std::collections::{HashMap, VecDeque};

use ajm_core::api::{
    ApiError, BatchExecutor, BatchResponse, JobSubmitter, RemoteStatus, RunId, StatusBatch,
    ThrottlePressure, ThrottleSource,
};
use ajm_core::config::SchedulerConfig;
use ajm_core::job::JobParams;
use ajm_core::partition::DateWindow;
use chrono::NaiveDate;

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Config with no delay between polls.
pub fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        poll_interval_secs: 0.0,
        ..Default::default()
    }
}

/// Behaviour of one run: `Running` for `polls` checks, then `outcome`.
#[derive(Debug, Clone, Copy)]
pub struct RunScript {
    pub polls: u32,
    pub outcome: RemoteStatus,
}

impl RunScript {
    pub fn completes_after(polls: u32) -> Self {
        Self {
            polls,
            outcome: RemoteStatus::Completed,
        }
    }

    pub fn fails_after(polls: u32) -> Self {
        Self {
            polls,
            outcome: RemoteStatus::Failed,
        }
    }
}

#[derive(Debug)]
struct Run {
    checks_left: u32,
    outcome: RemoteStatus,
}

/// Every submission with the effective pressure the service reported just before it.
#[derive(Debug, Clone)]
pub struct SubmitRecord {
    pub window: DateWindow,
    pub params: JobParams,
    pub pressure: f64,
}

#[derive(Debug, Default)]
pub struct ScriptedApi {
    /// Pressure values handed out by successive refreshes; the last one sticks.
    throttle: VecDeque<ThrottlePressure>,
    pressure: ThrottlePressure,
    /// Per-window run scripts, consumed one per submission.
    scripts: HashMap<NaiveDate, VecDeque<RunScript>>,
    default_script: Option<RunScript>,
    runs: HashMap<RunId, Run>,
    next_id: u32,
    /// Calls answered per batch round trip (0 = unlimited).
    pub batch_capacity: usize,
    pub submissions: Vec<SubmitRecord>,
    pub refreshes: usize,
    pub batches: usize,
    /// Every run id that was status-checked, in order.
    pub checked: Vec<RunId>,
    pub reject_submissions: bool,
    pub fail_refresh: bool,
}

impl ScriptedApi {
    /// Backend with constant pressure where every run completes on its first check.
    pub fn with_pressure(app: f64, account: f64) -> Self {
        Self::with_throttle([ThrottlePressure::new(app, account)])
    }

    pub fn with_throttle(seq: impl IntoIterator<Item = ThrottlePressure>) -> Self {
        Self {
            throttle: seq.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn default_script(mut self, script: RunScript) -> Self {
        self.default_script = Some(script);
        self
    }

    pub fn script(mut self, since: NaiveDate, runs: impl IntoIterator<Item = RunScript>) -> Self {
        self.scripts.entry(since).or_default().extend(runs);
        self
    }

    pub fn submissions_for(&self, since: NaiveDate) -> usize {
        self.submissions
            .iter()
            .filter(|s| s.window.since == since)
            .count()
    }
}

impl JobSubmitter for ScriptedApi {
    fn submit(&mut self, window: &DateWindow, params: &JobParams) -> Result<RunId, ApiError> {
        if self.reject_submissions {
            return Err(ApiError::Rejected("too many jobs".into()));
        }
        let script = self
            .scripts
            .get_mut(&window.since)
            .and_then(|q| q.pop_front())
            .or(self.default_script)
            .unwrap_or(RunScript::completes_after(0));
        self.next_id += 1;
        let run_id = RunId::new(format!("run-{}", self.next_id));
        self.runs.insert(
            run_id.clone(),
            Run {
                checks_left: script.polls,
                outcome: script.outcome,
            },
        );
        self.submissions.push(SubmitRecord {
            window: *window,
            params: params.clone(),
            pressure: self.pressure.effective(),
        });
        Ok(run_id)
    }
}

impl BatchExecutor for ScriptedApi {
    fn execute(&mut self, mut batch: StatusBatch) -> Result<BatchResponse, ApiError> {
        self.batches += 1;
        let residual = if self.batch_capacity > 0 {
            Some(batch.split_off(self.batch_capacity)).filter(|b| !b.is_empty())
        } else {
            None
        };
        let mut statuses = Vec::new();
        for id in batch {
            let run = self
                .runs
                .get_mut(&id)
                .ok_or_else(|| ApiError::UnknownRun(id.to_string()))?;
            let status = if run.checks_left > 0 {
                run.checks_left -= 1;
                RemoteStatus::Running
            } else {
                run.outcome
            };
            self.checked.push(id.clone());
            statuses.push((id, status));
        }
        Ok(BatchResponse { statuses, residual })
    }
}

impl ThrottleSource for ScriptedApi {
    fn refresh(&mut self) -> Result<(), ApiError> {
        if self.fail_refresh {
            return Err(ApiError::Transport("timed out".into()));
        }
        self.refreshes += 1;
        if self.throttle.len() > 1 {
            self.pressure = self.throttle.pop_front().unwrap_or_default();
        } else if let Some(last) = self.throttle.front() {
            self.pressure = *last;
        }
        Ok(())
    }

    fn current_pressure(&self) -> ThrottlePressure {
        self.pressure
    }
}
