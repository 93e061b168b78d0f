//! Brand profile: the operator's saved run settings, loaded from YAML.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::query::Query;
use crate::run::{Mode, Provider, ProviderSet, RunConfig};
use crate::ConfigError;

/// Upper bound on how many questions the generator is asked for.
pub const MAX_QUESTION_COUNT: u32 = 100;

fn default_question_count() -> u32 {
    15
}

fn default_company_id() -> String {
    RunConfig::DEFAULT_COMPANY_ID.to_string()
}

fn default_market() -> String {
    RunConfig::DEFAULT_MARKET.to_string()
}

fn default_language() -> String {
    RunConfig::DEFAULT_LANGUAGE.to_string()
}

fn default_providers() -> ProviderSet {
    let mut set = ProviderSet::new(Provider::Openai);
    set.insert(Provider::Gemini);
    set
}

/// Everything needed to build a [`RunConfig`] except the queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub brand_name: String,
    #[serde(default = "default_company_id")]
    pub company_id: String,
    #[serde(default)]
    pub industry: String,
    /// Business context handed to the query generator.
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default = "default_providers")]
    pub providers: ProviderSet,
    #[serde(default)]
    pub models: BTreeMap<Provider, String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub raw: bool,
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub inter_query_delay_ms: Option<u64>,
}

impl BrandProfile {
    /// A profile with defaults for everything but the brand name.
    #[must_use]
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            company_id: default_company_id(),
            industry: String::new(),
            description: String::new(),
            question_count: default_question_count(),
            providers: default_providers(),
            models: BTreeMap::new(),
            mode: Mode::default(),
            market: default_market(),
            language: default_language(),
            raw: false,
            timeout_seconds: None,
            max_retries: None,
            inter_query_delay_ms: None,
        }
    }

    /// Checks the fields the run form requires.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a blank brand name or an out-of-range
    /// question count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.brand_name.trim().is_empty() {
            return Err(ValidationError::BlankBrandName);
        }
        if self.question_count == 0 || self.question_count > MAX_QUESTION_COUNT {
            return Err(ValidationError::QuestionCount {
                got: self.question_count,
                max: MAX_QUESTION_COUNT,
            });
        }
        Ok(())
    }

    /// Builds the run request for `queries` from this profile.
    #[must_use]
    pub fn to_run_config(&self, queries: Vec<Query>) -> RunConfig {
        let mut config = RunConfig::new(self.brand_name.trim(), self.providers.clone(), queries);
        config.company_id.clone_from(&self.company_id);
        config.industry.clone_from(&self.industry);
        config.models.clone_from(&self.models);
        config.mode = self.mode;
        config.market.clone_from(&self.market);
        config.language.clone_from(&self.language);
        config.raw = self.raw;
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(delay) = self.inter_query_delay_ms {
            config.inter_query_delay_ms = delay;
        }
        config
    }
}

/// Load and validate a brand profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<BrandProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: BrandProfile = serde_yaml::from_str(&content)?;
    profile.validate()?;

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::query::parse_queries;

    fn write_profile(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(yaml.as_bytes()).expect("write profile");
        file
    }

    #[test]
    fn loads_minimal_profile_with_defaults() {
        let file = write_profile("brand_name: Sunday Natural\n");
        let profile = load_profile(file.path()).expect("profile should load");
        assert_eq!(profile.brand_name, "Sunday Natural");
        assert_eq!(profile.question_count, 15);
        assert_eq!(
            profile.providers.as_slice(),
            &[Provider::Openai, Provider::Gemini]
        );
        assert_eq!(profile.mode, Mode::ProviderWeb);
        assert_eq!(profile.market, "DE");
        assert_eq!(profile.language, "de");
    }

    #[test]
    fn loads_full_profile() {
        let file = write_profile(
            "brand_name: Acme\n\
             industry: SaaS\n\
             providers: [perplexity, anthropic]\n\
             models:\n  anthropic: claude-opus-4\n\
             mode: internal\n\
             market: US\n\
             language: en\n\
             max_retries: 3\n",
        );
        let profile = load_profile(file.path()).unwrap();
        assert_eq!(
            profile.providers.as_slice(),
            &[Provider::Perplexity, Provider::Anthropic]
        );
        let config = profile.to_run_config(parse_queries("best crm?"));
        assert_eq!(config.model_for(Provider::Anthropic), "claude-opus-4");
        assert_eq!(config.mode, Mode::Internal);
        assert_eq!(config.market, "US");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_seconds, RunConfig::DEFAULT_TIMEOUT_SECONDS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_provider_list() {
        let file = write_profile("brand_name: Acme\nproviders: []\n");
        let result = load_profile(file.path());
        assert!(
            matches!(result, Err(ConfigError::ProfileParse(_))),
            "got: {result:?}"
        );
    }

    #[test]
    fn rejects_blank_brand_name() {
        let file = write_profile("brand_name: '  '\n");
        let result = load_profile(file.path());
        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::BlankBrandName))
        ));
    }

    #[test]
    fn rejects_out_of_range_question_count() {
        let file = write_profile("brand_name: Acme\nquestion_count: 0\n");
        let result = load_profile(file.path());
        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::QuestionCount { got: 0, .. }))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = load_profile(Path::new("/nonexistent/geotrack/profile.yaml"));
        match result {
            Err(ConfigError::ProfileIo { path, .. }) => {
                assert!(path.contains("profile.yaml"));
            }
            other => panic!("expected ProfileIo, got: {other:?}"),
        }
    }
}
