//! Domain model for the GEO Tracker client.
//!
//! Holds the run configuration and result types shared by the API client,
//! the run orchestrator and the CLI, plus the pure pieces of the product:
//! the query builder, the results presenter, display formatting and
//! environment configuration.

pub mod app_config;
pub mod config;
pub mod error;
pub mod format;
pub mod presenter;
pub mod profile;
pub mod query;
pub mod records;
pub mod results;
pub mod run;
pub mod samples;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ValidationError};
pub use presenter::{
    competitor_frequency, filter_by_provider, providers_present, source_domain_frequency,
    CompetitorStat, ProviderFilter, SourceDomainStat,
};
pub use profile::{load_profile, BrandProfile};
pub use query::{market_display_name, parse_queries, queries_from_questions, Query};
pub use records::{
    AuthUser, BrandDetail, BrandRecord, BrandRun, GeneratedQueries, HealthStatus, Lead, LeadStats,
    LeadStatus, Permissions, RunHistoryEntry, SheetImport, SheetValidation, VisibilityReport,
};
pub use results::{QueryResult, RunResults, RunSummary, Source};
pub use run::{Mode, Provider, ProviderSet, RunConfig, RunHandle, RunProgress, RunStatus};
pub use samples::sample_queries_for_industry;
