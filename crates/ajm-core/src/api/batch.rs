//! Status batches: requests, responses and the merged report.

use std::collections::HashMap;
use std::fmt;

/// Identifier of one remote run. A restart produces a new run id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote status of a run as reported by a status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Accepted and still processing.
    Running,
    /// Finished; results can be fetched.
    Completed,
    /// Finished without results (failed or skipped by the service).
    Failed,
}

/// A set of status checks to send in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBatch {
    requests: Vec<RunId>,
}

impl StatusBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a status check for `run_id`. Does not block.
    pub fn push(&mut self, run_id: RunId) {
        self.requests.push(run_id);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[RunId] {
        &self.requests
    }

    /// Split off everything after the first `at` requests (used by backends
    /// that cap the number of calls per round trip).
    pub fn split_off(&mut self, at: usize) -> StatusBatch {
        let at = at.min(self.requests.len());
        StatusBatch {
            requests: self.requests.split_off(at),
        }
    }
}

impl FromIterator<RunId> for StatusBatch {
    fn from_iter<I: IntoIterator<Item = RunId>>(iter: I) -> Self {
        Self {
            requests: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StatusBatch {
    type Item = RunId;
    type IntoIter = std::vec::IntoIter<RunId>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

/// Result of executing one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchResponse {
    /// Statuses for the calls that went through.
    pub statuses: Vec<(RunId, RemoteStatus)>,
    /// Calls that must be executed again, if any.
    pub residual: Option<StatusBatch>,
}

/// Statuses collected across all round trips of one status check.
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    statuses: HashMap<RunId, RemoteStatus>,
}

impl StatusReport {
    pub fn get(&self, run_id: &RunId) -> Option<RemoteStatus> {
        self.statuses.get(run_id).copied()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Merge statuses from a response; later entries win.
    pub fn extend(&mut self, statuses: impl IntoIterator<Item = (RunId, RemoteStatus)>) {
        self.statuses.extend(statuses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_off_caps_and_keeps_order() {
        let mut batch: StatusBatch = (0..5).map(|i| RunId::new(format!("r{i}"))).collect();
        let rest = batch.split_off(3);
        assert_eq!(batch.len(), 3);
        assert_eq!(rest.requests(), &[RunId::new("r3"), RunId::new("r4")]);

        let none = batch.split_off(10);
        assert!(none.is_empty());
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn report_later_status_wins() {
        let mut report = StatusReport::default();
        report.extend([(RunId::new("a"), RemoteStatus::Running)]);
        report.extend([(RunId::new("a"), RemoteStatus::Completed)]);
        assert_eq!(report.get(&RunId::new("a")), Some(RemoteStatus::Completed));
        assert_eq!(report.get(&RunId::new("b")), None);
        assert_eq!(report.len(), 1);
    }
}
