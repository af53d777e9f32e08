//! Deterministic in-process backend.
//!
//! Implements all three service contracts without a network so the engine
//! can be exercised end to end (the `ajm simulate` command and tests). Time
//! is measured in service ticks: every status round trip and every throttle
//! refresh advances the clock by one tick, and a run finishes
//! `ticks_to_complete` ticks after it was submitted. A run is forgotten once
//! its final status has been reported.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::api::{
    ApiError, BatchExecutor, BatchResponse, JobSubmitter, RemoteStatus, RunId, StatusBatch,
    ThrottlePressure, ThrottleSource,
};
use crate::config::SimulationConfig;
use crate::job::JobParams;
use crate::partition::DateWindow;

#[derive(Debug, Clone)]
struct SimRun {
    ready_at: u64,
    outcome: RemoteStatus,
}

/// One submission as seen by the simulated service.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub run_id: RunId,
    pub window: DateWindow,
    pub params: JobParams,
}

#[derive(Debug, Clone)]
pub struct SimulatedApi {
    config: SimulationConfig,
    tick: u64,
    next_id: u64,
    runs: HashMap<RunId, SimRun>,
    /// Remaining scripted failures, keyed by window start.
    failures: HashMap<NaiveDate, u32>,
    submissions: Vec<Submission>,
    round_trips: u64,
    pressure: ThrottlePressure,
}

impl SimulatedApi {
    pub fn new(config: SimulationConfig) -> Self {
        let pressure = ThrottlePressure::new(config.app_pressure_base, config.account_pressure);
        Self {
            config,
            tick: 0,
            next_id: 0,
            runs: HashMap::new(),
            failures: HashMap::new(),
            submissions: Vec::new(),
            round_trips: 0,
            pressure,
        }
    }

    /// Make the first `count` runs of the window starting at `since` fail.
    pub fn fail_window(&mut self, since: NaiveDate, count: u32) {
        *self.failures.entry(since).or_default() += count;
    }

    /// Every submission so far, in order (restarts included).
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Status round trips executed so far.
    pub fn round_trips(&self) -> u64 {
        self.round_trips
    }

    /// Runs whose final status has not been reported yet.
    pub fn tracked_runs(&self) -> usize {
        self.runs.len()
    }

    /// Runs that have not finished yet.
    pub fn running(&self) -> usize {
        self.runs.values().filter(|r| r.ready_at > self.tick).count()
    }

    fn status_of(&self, run: &SimRun) -> RemoteStatus {
        if self.tick >= run.ready_at {
            run.outcome
        } else {
            RemoteStatus::Running
        }
    }

    fn recompute_pressure(&mut self) {
        let load = self.config.pressure_per_running_job * self.running() as f64;
        self.pressure = ThrottlePressure::new(
            self.config.app_pressure_base + load,
            self.config.account_pressure,
        );
    }
}

impl JobSubmitter for SimulatedApi {
    fn submit(&mut self, window: &DateWindow, params: &JobParams) -> Result<RunId, ApiError> {
        self.next_id += 1;
        let run_id = RunId::new(format!("sim-{}", self.next_id));
        let outcome = match self.failures.get_mut(&window.since) {
            Some(left) if *left > 0 => {
                *left -= 1;
                RemoteStatus::Failed
            }
            _ => RemoteStatus::Completed,
        };
        self.runs.insert(
            run_id.clone(),
            SimRun {
                ready_at: self.tick + self.config.ticks_to_complete,
                outcome,
            },
        );
        self.submissions.push(Submission {
            run_id: run_id.clone(),
            window: *window,
            params: params.clone(),
        });
        self.recompute_pressure();
        Ok(run_id)
    }
}

impl BatchExecutor for SimulatedApi {
    fn execute(&mut self, mut batch: StatusBatch) -> Result<BatchResponse, ApiError> {
        self.tick += 1;
        self.round_trips += 1;
        let residual = batch.split_off(self.config.batch_capacity.max(1));
        let mut statuses = Vec::with_capacity(batch.len());
        for id in batch {
            let run = self
                .runs
                .get(&id)
                .ok_or_else(|| ApiError::UnknownRun(id.to_string()))?;
            let status = self.status_of(run);
            if status != RemoteStatus::Running {
                self.runs.remove(&id);
            }
            statuses.push((id, status));
        }
        Ok(BatchResponse {
            statuses,
            residual: Some(residual).filter(|b| !b.is_empty()),
        })
    }
}

impl ThrottleSource for SimulatedApi {
    fn refresh(&mut self) -> Result<(), ApiError> {
        self.tick += 1;
        self.recompute_pressure();
        Ok(())
    }

    fn current_pressure(&self) -> ThrottlePressure {
        self.pressure
    }
}
