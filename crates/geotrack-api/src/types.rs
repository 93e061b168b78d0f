//! Wire types for the GEO Tracker backend.
//!
//! Response structs are lenient: optional fields default, `null` lists are
//! accepted, and identifiers may arrive as strings or numbers. Converting
//! them into domain types is [`crate::normalize`]'s job.

use std::collections::BTreeMap;

use geotrack_core::{Provider, QueryResult, RunConfig, RunStatus, RunSummary};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One query as sent in the start-run payload.
#[derive(Debug, Serialize)]
pub struct QueryPayload<'a> {
    pub question: &'a str,
    pub category: Option<&'a str>,
    pub prompt_id: Option<&'a str>,
}

/// Body of `POST /api/runs`.
///
/// Every provider's model is sent, not just the selected ones; unselected
/// providers carry their default model and are ignored by the backend.
#[derive(Debug, Serialize)]
pub struct StartRunPayload<'a> {
    pub company_id: &'a str,
    pub brand_name: &'a str,
    pub industry: &'a str,
    pub providers: Vec<&'static str>,
    pub openai_model: &'a str,
    pub gemini_model: &'a str,
    pub perplexity_model: &'a str,
    pub anthropic_model: &'a str,
    pub mode: &'static str,
    pub queries: Vec<QueryPayload<'a>>,
    pub market: &'a str,
    pub lang: &'a str,
    pub raw: bool,
    pub request_timeout: u32,
    pub max_retries: u32,
    pub sleep_ms: u64,
}

impl<'a> StartRunPayload<'a> {
    #[must_use]
    pub fn from_config(config: &'a RunConfig) -> Self {
        Self {
            company_id: &config.company_id,
            brand_name: &config.brand_name,
            industry: &config.industry,
            providers: config.providers.iter().map(Provider::as_str).collect(),
            openai_model: config.model_for(Provider::Openai),
            gemini_model: config.model_for(Provider::Gemini),
            perplexity_model: config.model_for(Provider::Perplexity),
            anthropic_model: config.model_for(Provider::Anthropic),
            mode: config.mode.as_str(),
            queries: config
                .queries
                .iter()
                .map(|q| QueryPayload {
                    question: &q.question,
                    category: q.category.as_deref(),
                    prompt_id: Some(q.prompt_id.as_str()).filter(|id| !id.is_empty()),
                })
                .collect(),
            market: &config.market,
            lang: &config.language,
            raw: config.raw,
            request_timeout: config.timeout_seconds,
            max_retries: config.max_retries,
            sleep_ms: config.inter_query_delay_ms,
        }
    }
}

/// Body of `POST /api/queries/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateQueriesPayload<'a> {
    pub company_name: &'a str,
    pub industry: &'a str,
    pub description: &'a str,
    pub language: &'a str,
    pub count: u32,
    pub target_market: &'a str,
    pub provider: &'a str,
}

/// Body of `POST /api/sheets/prompts`.
#[derive(Debug, Serialize)]
pub struct SheetPromptsPayload<'a> {
    pub sheet_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worksheet_name: Option<&'a str>,
    pub force_refresh: bool,
}

/// Body of `POST /api/reports/visibility`.
#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<&'a str>,
    pub brand_name: &'a str,
    pub results_summary: &'a RunSummary,
    pub detailed_results: &'a [QueryResult],
    pub provider: &'a str,
    pub model: &'a str,
    pub force_regenerate: bool,
}

/// Body of `PATCH /api/admin/leads/{id}`.
#[derive(Debug, Serialize)]
pub struct LeadUpdatePayload<'a> {
    pub status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Run responses
// ---------------------------------------------------------------------------

/// Response of `POST /api/runs`.
#[derive(Debug, Deserialize)]
pub struct JobCreatedResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub run_id: Option<String>,
    #[serde(default)]
    pub status: Option<RunStatus>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub estimated_duration_seconds: Option<f64>,
}

/// Response of `GET /api/runs/{job_id}/status`.
#[derive(Debug, Deserialize)]
pub struct RunStatusResponse {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub run_id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub total_tasks: Option<u32>,
    #[serde(default)]
    pub completed_tasks: Option<u32>,
    #[serde(default)]
    pub failed_tasks: Option<u32>,
    #[serde(default)]
    pub progress_percent: Option<f64>,
    #[serde(default)]
    pub current_provider: Option<String>,
    #[serde(default)]
    pub current_query: Option<String>,
    #[serde(default)]
    pub estimated_remaining_seconds: Option<f64>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /api/runs/{job_id}/results`.
#[derive(Debug, Deserialize)]
pub struct RunResultsResponse {
    pub summary: RawRunSummary,
    #[serde(default)]
    pub results: Option<Vec<RawQueryResult>>,
}

#[derive(Debug, Deserialize)]
pub struct RawRunSummary {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub run_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub status: Option<RunStatus>,
    #[serde(default)]
    pub total_queries: Option<u32>,
    #[serde(default)]
    pub total_responses: Option<u32>,
    #[serde(default)]
    pub overall_visibility: Option<f64>,
    #[serde(default)]
    pub avg_sentiment: Option<f64>,
    #[serde(default)]
    pub avg_trust_authority: Option<f64>,
    #[serde(default)]
    pub provider_visibility: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub competitor_visibility: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// A cited source: either a bare URL or `{url, title}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSource {
    Url(String),
    Object {
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub struct RawQueryResult {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub prompt_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub response_text: Option<String>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub tokens_in: Option<u64>,
    #[serde(default)]
    pub tokens_out: Option<u64>,
    #[serde(default)]
    pub presence: Option<f64>,
    #[serde(default)]
    pub sentiment: Option<f64>,
    #[serde(default)]
    pub trust_authority: Option<f64>,
    #[serde(default)]
    pub brand_mentioned: Option<bool>,
    #[serde(default)]
    pub other_brands_detected: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<RawSource>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /api/runs` returns either a bare list or `{runs: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RunListResponse<T> {
    List(Vec<T>),
    Wrapped { runs: Vec<T> },
}

impl<T> RunListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            RunListResponse::List(runs) | RunListResponse::Wrapped { runs } => runs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Query and sheet responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawQuery {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub prompt_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQueriesResponse {
    #[serde(default)]
    pub queries: Option<Vec<RawQuery>>,
    #[serde(default)]
    pub generated_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ColumnsDetected {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SheetPromptsResponse {
    #[serde(default)]
    pub prompts: Option<Vec<RawQuery>>,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub columns_detected: Option<ColumnsDetected>,
    #[serde(default)]
    pub all_columns: Option<Vec<String>>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub sheet_title: Option<String>,
    #[serde(default)]
    pub sheet_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Brands, auth and leads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BrandListResponse<T> {
    #[serde(default = "Vec::new")]
    pub brands: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct BrandHistoryResponse<T> {
    #[serde(default = "Vec::new")]
    pub history: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct BrandSearchResponse<T> {
    #[serde(default = "Option::default")]
    pub brand: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResponse<T> {
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default = "Option::default")]
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct LeadListResponse<T> {
    #[serde(default = "Vec::new")]
    pub leads: Vec<T>,
}
