use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_AGENT: &str = "geotrack/0.1 (visibility-client)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_url = or_default("GEOTRACK_API_URL", DEFAULT_API_URL);
    url::Url::parse(&api_url).map_err(|e| ConfigError::InvalidEnvVar {
        var: "GEOTRACK_API_URL".to_string(),
        reason: e.to_string(),
    })?;

    let api_token = lookup("GEOTRACK_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let log_level = or_default("GEOTRACK_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("GEOTRACK_REQUEST_TIMEOUT_SECS", "30")?;
    let poll_interval_ms = parse_u64("GEOTRACK_POLL_INTERVAL_MS", "2000")?;
    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOTRACK_POLL_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("GEOTRACK_USER_AGENT", DEFAULT_USER_AGENT);
    let session_path = lookup("GEOTRACK_SESSION_PATH").ok().map(PathBuf::from);

    Ok(AppConfig {
        api_url,
        api_token,
        log_level,
        request_timeout_secs,
        poll_interval_ms,
        user_agent,
        session_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
