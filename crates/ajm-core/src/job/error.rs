//! Job error type.

use super::JobState;
use crate::api::ApiError;
use crate::partition::DateWindow;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// The backend could not accept the submission.
    #[error("submitting job for {window} failed")]
    Submit {
        window: DateWindow,
        #[source]
        source: ApiError,
    },
    /// `start`/`restart` called from a state that does not allow it.
    #[error("cannot {action} job for {window} while {from}")]
    InvalidTransition {
        window: DateWindow,
        from: JobState,
        action: &'static str,
    },
}
