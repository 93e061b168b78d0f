use std::future::Future;

use geotrack_api::{ApiClient, ApiError};
use geotrack_core::{RunConfig, RunHandle, RunProgress, RunResults};

/// The run endpoints the orchestrator drives.
///
/// Implemented by [`ApiClient`]; tests substitute scripted fakes.
pub trait RunBackend: Send + Sync + 'static {
    fn start_run(
        &self,
        config: &RunConfig,
    ) -> impl Future<Output = Result<RunHandle, ApiError>> + Send;

    fn run_status(&self, job_id: &str)
        -> impl Future<Output = Result<RunProgress, ApiError>> + Send;

    fn run_results(&self, job_id: &str)
        -> impl Future<Output = Result<RunResults, ApiError>> + Send;

    fn cancel_run(&self, job_id: &str) -> impl Future<Output = Result<String, ApiError>> + Send;
}

impl RunBackend for ApiClient {
    fn start_run(
        &self,
        config: &RunConfig,
    ) -> impl Future<Output = Result<RunHandle, ApiError>> + Send {
        ApiClient::start_run(self, config)
    }

    fn run_status(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<RunProgress, ApiError>> + Send {
        ApiClient::run_status(self, job_id)
    }

    fn run_results(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<RunResults, ApiError>> + Send {
        ApiClient::run_results(self, job_id)
    }

    fn cancel_run(&self, job_id: &str) -> impl Future<Output = Result<String, ApiError>> + Send {
        ApiClient::cancel_run(self, job_id)
    }
}
