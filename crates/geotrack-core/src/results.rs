//! Result set of a completed run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::run::RunStatus;

/// A source cited by a provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Outcome of one question asked to one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub prompt_id: Option<String>,
    pub category: Option<String>,
    pub question: String,
    pub provider: String,
    pub model: String,
    pub mode: Option<String>,
    pub response_text: String,
    pub brand_mentioned: bool,
    /// Sentiment toward the tracked brand in `[-1.0, 1.0]`.
    pub sentiment: Option<f64>,
    pub trust_authority: Option<f64>,
    pub presence: Option<f64>,
    pub other_brands_detected: Vec<String>,
    pub sources: Vec<Source>,
    pub latency_ms: Option<f64>,
    pub tokens_in: Option<u64>,
    pub tokens_out: Option<u64>,
    pub timestamp: Option<String>,
}

/// Aggregates computed server-side for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub company_id: String,
    pub brand_name: String,
    pub status: RunStatus,
    pub total_queries: u32,
    pub total_responses: u32,
    /// Percentage of responses that mentioned the brand.
    pub overall_visibility: f64,
    pub avg_sentiment: Option<f64>,
    pub avg_trust_authority: Option<f64>,
    pub provider_visibility: BTreeMap<String, f64>,
    pub competitor_visibility: BTreeMap<String, f64>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub duration_seconds: Option<f64>,
}

/// Everything fetched for a completed run. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResults {
    pub summary: RunSummary,
    pub results: Vec<QueryResult>,
}
