//! Run lifecycle endpoints: start, status, results, cancel, history.

use geotrack_core::{RunConfig, RunHandle, RunHistoryEntry, RunProgress, RunResults};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::normalize::{normalize_handle, normalize_progress, normalize_results};
use crate::types::{
    JobCreatedResponse, MessageResponse, RunListResponse, RunResultsResponse, RunStatusResponse,
    StartRunPayload,
};

impl ApiClient {
    /// `POST /api/runs`: submits a run and returns its job identifiers.
    ///
    /// Does not validate `config`; callers go through the orchestrator, which
    /// does.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Status`] with the backend's message on a non-2xx response.
    /// - [`ApiError::Deserialize`] if the response does not match.
    pub async fn start_run(&self, config: &RunConfig) -> Result<RunHandle, ApiError> {
        let url = self.endpoint(&["api", "runs"], &[]);
        let payload = StartRunPayload::from_config(config);
        tracing::debug!(
            brand = %config.brand_name,
            queries = payload.queries.len(),
            providers = payload.providers.len(),
            "submitting run"
        );
        let raw: JobCreatedResponse = self.post_json(url, Some(&payload), "start_run").await?;
        Ok(normalize_handle(raw))
    }

    /// `GET /api/runs/{job_id}/status`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the job is unknown.
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn run_status(&self, job_id: &str) -> Result<RunProgress, ApiError> {
        let url = self.endpoint(&["api", "runs", job_id, "status"], &[]);
        let raw: RunStatusResponse = self
            .get_json(url, &format!("run_status(job_id={job_id})"))
            .await?;
        Ok(normalize_progress(raw))
    }

    /// `GET /api/runs/{job_id}/results`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the job is unknown.
    /// - [`ApiError::Status`] if results are not available yet.
    /// - [`ApiError::Http`] or [`ApiError::Deserialize`] as for any request.
    pub async fn run_results(&self, job_id: &str) -> Result<RunResults, ApiError> {
        let url = self.endpoint(&["api", "runs", job_id, "results"], &[]);
        let raw: RunResultsResponse = self
            .get_json(url, &format!("run_results(job_id={job_id})"))
            .await?;
        Ok(normalize_results(raw))
    }

    /// `POST /api/runs/{job_id}/cancel`. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// As for [`ApiClient::run_status`].
    pub async fn cancel_run(&self, job_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["api", "runs", job_id, "cancel"], &[]);
        let raw: MessageResponse = self
            .post_json(url, None::<&()>, &format!("cancel_run(job_id={job_id})"))
            .await?;
        Ok(raw.message.unwrap_or_else(|| "Cancellation requested".to_string()))
    }

    /// `GET /api/runs?limit=`: most recent runs first.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn list_runs(&self, limit: u32) -> Result<Vec<RunHistoryEntry>, ApiError> {
        let limit = limit.to_string();
        let url = self.endpoint(&["api", "runs"], &[("limit", &limit)]);
        let raw: RunListResponse<RunHistoryEntry> = self.get_json(url, "list_runs").await?;
        Ok(raw.into_vec())
    }
}
