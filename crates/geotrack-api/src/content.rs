//! Query generation, Google Sheet import, and AI visibility reports.

use geotrack_core::{
    market_display_name, GeneratedQueries, RunResults, SheetImport, SheetValidation,
    VisibilityReport,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::normalize::{normalize_generated, normalize_sheet};
use crate::types::{
    GenerateQueriesPayload, GenerateQueriesResponse, ReportPayload, SheetPromptsPayload,
    SheetPromptsResponse,
};

/// Input for the backend's query generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryGenerationRequest {
    pub company_name: String,
    pub industry: String,
    pub description: String,
    pub language: String,
    pub count: u32,
    /// Market code, e.g. `"DE"`. Sent as the country name.
    pub market: String,
}

/// Options for [`ApiClient::generate_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub job_id: Option<String>,
    pub brand_name: String,
    pub provider: String,
    pub model: String,
    pub force_regenerate: bool,
}

impl ReportRequest {
    pub const DEFAULT_PROVIDER: &'static str = "openai";
    pub const DEFAULT_MODEL: &'static str = "gpt-4.1";

    #[must_use]
    pub fn new(brand_name: impl Into<String>, job_id: Option<String>) -> Self {
        Self {
            job_id,
            brand_name: brand_name.into(),
            provider: Self::DEFAULT_PROVIDER.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            force_regenerate: false,
        }
    }
}

impl ApiClient {
    /// `POST /api/queries/generate`.
    ///
    /// The returned queries carry fresh `q_<n>` ids. Check
    /// [`GeneratedQueries::is_fallback`] to tell template output from LLM
    /// output.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn generate_queries(
        &self,
        request: &QueryGenerationRequest,
    ) -> Result<GeneratedQueries, ApiError> {
        let url = self.endpoint(&["api", "queries", "generate"], &[]);
        let payload = GenerateQueriesPayload {
            company_name: &request.company_name,
            industry: &request.industry,
            description: &request.description,
            language: &request.language,
            count: request.count,
            target_market: market_display_name(&request.market),
            provider: "auto",
        };
        let raw: GenerateQueriesResponse = self
            .post_json(url, Some(&payload), "generate_queries")
            .await?;
        Ok(normalize_generated(raw))
    }

    /// `POST /api/sheets/prompts`: imports prompts from a Google Sheet.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] with the backend's reason if the sheet cannot be
    ///   read (not shared, no question column, ...).
    /// - [`ApiError::Http`] or [`ApiError::Deserialize`] as for any request.
    pub async fn import_sheet(
        &self,
        sheet_url: &str,
        worksheet_name: Option<&str>,
        force_refresh: bool,
    ) -> Result<SheetImport, ApiError> {
        let url = self.endpoint(&["api", "sheets", "prompts"], &[]);
        let payload = SheetPromptsPayload {
            sheet_url,
            worksheet_name,
            force_refresh,
        };
        let raw: SheetPromptsResponse = self.post_json(url, Some(&payload), "import_sheet").await?;
        Ok(normalize_sheet(raw))
    }

    /// `GET /api/sheets/validate?url=`: checks a sheet without importing it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn validate_sheet(&self, sheet_url: &str) -> Result<SheetValidation, ApiError> {
        let url = self.endpoint(&["api", "sheets", "validate"], &[("url", sheet_url)]);
        self.get_json(url, "validate_sheet").await
    }

    /// `POST /api/reports/visibility`: asks the backend to write an AI
    /// analysis of a completed run.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`], [`ApiError::Status`] or [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn generate_report(
        &self,
        request: &ReportRequest,
        results: &RunResults,
    ) -> Result<VisibilityReport, ApiError> {
        let url = self.endpoint(&["api", "reports", "visibility"], &[]);
        let payload = ReportPayload {
            job_id: request.job_id.as_deref(),
            brand_name: &request.brand_name,
            results_summary: &results.summary,
            detailed_results: &results.results,
            provider: &request.provider,
            model: &request.model,
            force_regenerate: request.force_regenerate,
        };
        tracing::debug!(
            brand = %request.brand_name,
            results = results.results.len(),
            force = request.force_regenerate,
            "requesting visibility report"
        );
        self.post_json(url, Some(&payload), "generate_report").await
    }

    /// `GET /api/reports/{job_id}`: a previously generated report, if any.
    ///
    /// # Errors
    ///
    /// Any error other than 404, which maps to `Ok(None)`.
    pub async fn cached_report(&self, job_id: &str) -> Result<Option<VisibilityReport>, ApiError> {
        let url = self.endpoint(&["api", "reports", job_id], &[]);
        match self
            .get_json::<VisibilityReport>(url, &format!("cached_report(job_id={job_id})"))
            .await
        {
            Ok(mut report) => {
                report.from_cache = true;
                Ok(Some(report))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
