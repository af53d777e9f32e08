//! Backend error type.

/// Failure reported by a backend call (submit, status batch, throttle refresh).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
    /// The request could not be delivered or the reply was unusable.
    #[error("transport error: {0}")]
    Transport(String),
    /// A status check named a run the service does not know.
    #[error("unknown run {0}")]
    UnknownRun(String),
}
