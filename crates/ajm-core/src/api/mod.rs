//! Contracts for the remote async-job service.
//!
//! The engine never talks to the network itself. It submits windows through a
//! [`JobSubmitter`], checks run status through a [`BatchExecutor`] (many
//! checks per round trip), and reads admission pressure from a
//! [`ThrottleSource`]. A backend implements all three; [`AsyncJobApi`] is the
//! combined bound the scheduler uses.

mod batch;
mod error;
mod throttle;

pub use batch::{BatchResponse, RemoteStatus, RunId, StatusBatch, StatusReport};
pub use error::ApiError;
pub use throttle::ThrottlePressure;

use crate::job::JobParams;
use crate::partition::DateWindow;

/// Submits one remote run for a window.
pub trait JobSubmitter {
    /// Issue the submission synchronously and return the id of the new run.
    /// The remote work itself completes asynchronously.
    fn submit(&mut self, window: &DateWindow, params: &JobParams) -> Result<RunId, ApiError>;
}

/// Executes a batch of status checks in one round trip.
pub trait BatchExecutor {
    /// Run every request in `batch`. Calls that did not go through come back
    /// in `BatchResponse::residual` and must be executed again by the caller.
    fn execute(&mut self, batch: StatusBatch) -> Result<BatchResponse, ApiError>;
}

/// Admission-pressure gauge shared with every other client of the account.
pub trait ThrottleSource {
    /// Ask the service to report fresh pressure values on the next read.
    fn refresh(&mut self) -> Result<(), ApiError>;

    /// Last known pressure pair (app scope, account scope).
    fn current_pressure(&self) -> ThrottlePressure;
}

/// Everything the scheduler needs from a backend.
pub trait AsyncJobApi: JobSubmitter + BatchExecutor + ThrottleSource {}

impl<T: JobSubmitter + BatchExecutor + ThrottleSource> AsyncJobApi for T {}
