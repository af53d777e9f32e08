//! Restart policy for failed jobs.
//!
//! Failed runs are restarted in place with no backoff; the scheduler's own
//! fixed poll interval paces them. The only knob is how many submissions a
//! window gets before its failure is final.

/// Decision returned by the restart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// Submit the window again.
    Restart,
    /// Out of attempts; the failure is permanent.
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    /// Maximum number of submissions per window (including the first).
    pub max_attempts: u32,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

impl RestartPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Decide what to do with a job whose run `attempts` (1-based) just failed.
    pub fn decide(&self, attempts: u32) -> RestartDecision {
        if attempts >= self.max_attempts {
            RestartDecision::GiveUp
        } else {
            RestartDecision::Restart
        }
    }
}
