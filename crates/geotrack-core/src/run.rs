//! Run configuration and server-reported run lifecycle types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::query::Query;

/// LLM provider a run can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Openai,
    Gemini,
    Perplexity,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Openai,
        Provider::Gemini,
        Provider::Perplexity,
        Provider::Anthropic,
    ];

    /// Wire name, also used as the `<provider>_model` key prefix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Openai => "openai",
            Provider::Gemini => "gemini",
            Provider::Perplexity => "perplexity",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Model used when the operator has not picked one.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Openai => "gpt-4.1-mini",
            Provider::Gemini => "gemini-2.5-flash",
            Provider::Perplexity => "sonar",
            Provider::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::Openai),
            "gemini" => Ok(Provider::Gemini),
            "perplexity" => Ok(Provider::Perplexity),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(format!(
                "unknown provider '{other}'; expected one of openai, gemini, perplexity, anthropic"
            )),
        }
    }
}

/// Where providers draw their answers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Trained knowledge only.
    Internal,
    /// Live web-augmented answers.
    #[default]
    ProviderWeb,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Internal => "internal",
            Mode::ProviderWeb => "provider_web",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(Mode::Internal),
            "provider_web" | "web" => Ok(Mode::ProviderWeb),
            other => Err(format!(
                "unknown mode '{other}'; expected internal or provider_web"
            )),
        }
    }
}

/// Ordered, duplicate-free, never-empty provider selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Provider>", into = "Vec<Provider>")]
pub struct ProviderSet(Vec<Provider>);

impl ProviderSet {
    #[must_use]
    pub fn new(first: Provider) -> Self {
        Self(vec![first])
    }

    /// Adds a provider; returns `false` if it was already selected.
    pub fn insert(&mut self, provider: Provider) -> bool {
        if self.0.contains(&provider) {
            return false;
        }
        self.0.push(provider);
        true
    }

    /// Removes a provider unless it is the last one selected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LastProvider`] if removing `provider` would
    /// leave the selection empty.
    pub fn remove(&mut self, provider: Provider) -> Result<bool, ValidationError> {
        let Some(pos) = self.0.iter().position(|p| *p == provider) else {
            return Ok(false);
        };
        if self.0.len() == 1 {
            return Err(ValidationError::LastProvider(provider.to_string()));
        }
        self.0.remove(pos);
        Ok(true)
    }

    #[must_use]
    pub fn contains(&self, provider: Provider) -> bool {
        self.0.contains(&provider)
    }

    pub fn iter(&self) -> impl Iterator<Item = Provider> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Provider] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Provider>> for ProviderSet {
    type Error = ValidationError;

    fn try_from(providers: Vec<Provider>) -> Result<Self, Self::Error> {
        let mut iter = providers.into_iter();
        let first = iter.next().ok_or(ValidationError::NoProviders)?;
        let mut set = Self::new(first);
        for provider in iter {
            set.insert(provider);
        }
        Ok(set)
    }
}

impl From<ProviderSet> for Vec<Provider> {
    fn from(set: ProviderSet) -> Self {
        set.0
    }
}

/// One analysis request. Built by the presentation layer and sent once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub company_id: String,
    pub brand_name: String,
    pub industry: String,
    pub providers: ProviderSet,
    /// Explicit model choices; providers without an entry use their default.
    #[serde(default)]
    pub models: BTreeMap<Provider, String>,
    pub mode: Mode,
    pub queries: Vec<Query>,
    pub market: String,
    pub language: String,
    /// Ask the backend to keep raw provider payloads.
    pub raw: bool,
    pub timeout_seconds: u32,
    pub max_retries: u32,
    pub inter_query_delay_ms: u64,
}

impl RunConfig {
    pub const DEFAULT_COMPANY_ID: &'static str = "demo-company";
    pub const DEFAULT_MARKET: &'static str = "DE";
    pub const DEFAULT_LANGUAGE: &'static str = "de";
    pub const DEFAULT_TIMEOUT_SECONDS: u32 = 60;
    pub const DEFAULT_MAX_RETRIES: u32 = 1;

    /// Creates a config with the backend's documented defaults.
    #[must_use]
    pub fn new(brand_name: impl Into<String>, providers: ProviderSet, queries: Vec<Query>) -> Self {
        Self {
            company_id: Self::DEFAULT_COMPANY_ID.to_string(),
            brand_name: brand_name.into(),
            industry: String::new(),
            providers,
            models: BTreeMap::new(),
            mode: Mode::default(),
            queries,
            market: Self::DEFAULT_MARKET.to_string(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            raw: false,
            timeout_seconds: Self::DEFAULT_TIMEOUT_SECONDS,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            inter_query_delay_ms: 0,
        }
    }

    /// Model id sent for `provider`.
    #[must_use]
    pub fn model_for(&self, provider: Provider) -> &str {
        self.models
            .get(&provider)
            .map_or_else(|| provider.default_model(), String::as_str)
    }

    /// Checks the preconditions for submission.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyQueries`] if there is nothing to analyze.
    /// - [`ValidationError::BlankBrandName`] if the brand name is blank.
    /// - [`ValidationError::NoProviders`] if the provider set is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queries.is_empty() {
            return Err(ValidationError::EmptyQueries);
        }
        if self.brand_name.trim().is_empty() {
            return Err(ValidationError::BlankBrandName);
        }
        if self.providers.is_empty() {
            return Err(ValidationError::NoProviders);
        }
        Ok(())
    }
}

/// Job identifiers returned once the backend accepts a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHandle {
    pub job_id: String,
    pub run_id: String,
    pub status: RunStatus,
    pub message: Option<String>,
    pub estimated_duration_seconds: Option<f64>,
}

/// Server-side state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunStatus {
    /// `true` once the server will not report further progress.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress snapshot reported by the status endpoint.
///
/// `completed_tasks + failed_tasks <= total_tasks` is expected but the server
/// is authoritative, so it is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunProgress {
    pub run_id: String,
    pub status: RunStatus,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub failed_tasks: u32,
    pub progress_percent: f64,
    pub current_provider: Option<String>,
    pub current_query: Option<String>,
    pub estimated_remaining_seconds: Option<f64>,
    pub started_at: Option<String>,
    pub updated_at: Option<String>,
    pub error: Option<String>,
}

impl RunProgress {
    /// Operator-facing message for a failed or cancelled run.
    ///
    /// Only the first line of the server's error detail is kept. Returns
    /// `None` for any other status.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        if !matches!(self.status, RunStatus::Failed | RunStatus::Cancelled) {
            return None;
        }
        let first_line = self
            .error
            .as_deref()
            .and_then(|e| e.lines().next())
            .map(str::trim)
            .filter(|line| !line.is_empty());
        Some(match first_line {
            Some(line) => format!("Run {}: {line}", self.status),
            None => format!("Run {}", self.status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_queries;

    fn progress(status: RunStatus, error: Option<&str>) -> RunProgress {
        RunProgress {
            run_id: "run-1".to_string(),
            status,
            total_tasks: 4,
            completed_tasks: 2,
            failed_tasks: 0,
            progress_percent: 50.0,
            current_provider: None,
            current_query: None,
            estimated_remaining_seconds: None,
            started_at: None,
            updated_at: None,
            error: error.map(str::to_string),
        }
    }

    fn config() -> RunConfig {
        RunConfig::new(
            "Acme",
            ProviderSet::new(Provider::Openai),
            parse_queries("best vitamins?"),
        )
    }

    #[test]
    fn provider_set_rejects_removing_last_provider() {
        let mut set = ProviderSet::new(Provider::Openai);
        let err = set.remove(Provider::Openai).unwrap_err();
        assert_eq!(err, ValidationError::LastProvider("openai".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn provider_set_insert_is_deduplicated() {
        let mut set = ProviderSet::new(Provider::Openai);
        assert!(set.insert(Provider::Gemini));
        assert!(!set.insert(Provider::Openai));
        assert_eq!(set.as_slice(), &[Provider::Openai, Provider::Gemini]);
        assert!(set.remove(Provider::Openai).unwrap());
        assert_eq!(set.as_slice(), &[Provider::Gemini]);
    }

    #[test]
    fn provider_set_deserialize_rejects_empty_list() {
        let result: Result<ProviderSet, _> = serde_json::from_str("[]");
        assert!(result.is_err());
        let set: ProviderSet = serde_json::from_str(r#"["gemini","gemini","anthropic"]"#).unwrap();
        assert_eq!(set.as_slice(), &[Provider::Gemini, Provider::Anthropic]);
    }

    #[test]
    fn validate_rejects_empty_queries() {
        let mut cfg = config();
        cfg.queries.clear();
        assert_eq!(cfg.validate(), Err(ValidationError::EmptyQueries));
    }

    #[test]
    fn validate_rejects_blank_brand() {
        let mut cfg = config();
        cfg.brand_name = "   ".to_string();
        assert_eq!(cfg.validate(), Err(ValidationError::BlankBrandName));
    }

    #[test]
    fn model_for_falls_back_to_default() {
        let mut cfg = config();
        cfg.models.insert(Provider::Gemini, "gemini-2.5-pro".to_string());
        assert_eq!(cfg.model_for(Provider::Gemini), "gemini-2.5-pro");
        assert_eq!(cfg.model_for(Provider::Openai), "gpt-4.1-mini");
        assert_eq!(cfg.model_for(Provider::Perplexity), "sonar");
    }

    #[test]
    fn provider_and_mode_parse_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::Openai);
        assert!("mistral".parse::<Provider>().is_err());
        assert_eq!("provider_web".parse::<Mode>().unwrap(), Mode::ProviderWeb);
        assert_eq!("internal".parse::<Mode>().unwrap(), Mode::Internal);
    }

    #[test]
    fn failure_message_keeps_first_line() {
        let p = progress(RunStatus::Failed, Some("rate limited\ntraceback..."));
        assert_eq!(p.failure_message().as_deref(), Some("Run failed: rate limited"));
    }

    #[test]
    fn failure_message_without_detail() {
        let p = progress(RunStatus::Cancelled, None);
        assert_eq!(p.failure_message().as_deref(), Some("Run cancelled"));
    }

    #[test]
    fn failure_message_none_for_non_failures() {
        assert!(progress(RunStatus::Running, Some("x")).failure_message().is_none());
        assert!(progress(RunStatus::Completed, None).failure_message().is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!RunStatus::Pending.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
    }
}
