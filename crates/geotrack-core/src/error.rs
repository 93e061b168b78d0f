use thiserror::Error;

/// Errors raised while loading environment configuration or a brand profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profile file {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile file: {0}")]
    ProfileParse(#[from] serde_yaml::Error),

    #[error("invalid profile: {0}")]
    Validation(#[from] ValidationError),
}

/// A run request that must not reach the network.
///
/// Raised before any request is issued; the operator has to correct the
/// input before resubmitting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no queries to analyze; add at least one question")]
    EmptyQueries,

    #[error("brand name must be non-empty")]
    BlankBrandName,

    #[error("at least one provider must be selected")]
    NoProviders,

    #[error("cannot remove {0}: it is the last selected provider")]
    LastProvider(String),

    #[error("question count must be between 1 and {max}, got {got}")]
    QuestionCount { got: u32, max: u32 },
}
