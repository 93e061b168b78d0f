use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Backend base URL, without a trailing slash requirement.
    pub api_url: String,
    pub api_token: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub user_agent: String,
    /// Overrides the default session file location.
    pub session_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("user_agent", &self.user_agent)
            .field("session_path", &self.session_path)
            .finish()
    }
}
