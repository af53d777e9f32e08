//! Local job state.

use crate::api::RemoteStatus;

/// Lifecycle state of a job as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub(crate) fn from_remote(status: RemoteStatus) -> Self {
        match status {
            RemoteStatus::Running => JobState::Running,
            RemoteStatus::Completed => JobState::Completed,
            RemoteStatus::Failed => JobState::Failed,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
