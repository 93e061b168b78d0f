//! Run orchestration: submits a run, polls it to a terminal status, and
//! publishes every state change to observers.

pub mod backend;
pub mod error;
pub mod orchestrator;

pub use backend::RunBackend;
pub use error::RunError;
pub use orchestrator::{OrchestratorOptions, RunOrchestrator, RunPhase, RunSnapshot};
