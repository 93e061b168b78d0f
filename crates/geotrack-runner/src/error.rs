use geotrack_api::ApiError;
use geotrack_core::ValidationError;
use thiserror::Error;

/// Errors returned by [`crate::RunOrchestrator`] operations.
///
/// Job failures reported by the server are not errors here; they surface as
/// the snapshot's `error` string with phase `Failed` or `Cancelled`.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration was rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another `submit` is still waiting for the backend.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// A run is polling or finished; `reset` before starting another.
    #[error("a run is already active; start a new analysis first")]
    RunActive,

    #[error("no active run")]
    NoActiveRun,

    #[error(transparent)]
    Transport(#[from] ApiError),
}

impl RunError {
    /// `true` for the duplicate-submit guard, which callers ignore silently.
    #[must_use]
    pub fn is_duplicate_submit(&self) -> bool {
        matches!(self, RunError::SubmissionInFlight)
    }
}
