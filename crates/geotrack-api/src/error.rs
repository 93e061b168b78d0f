use thiserror::Error;

/// Errors returned by the GEO Tracker API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` follows the backend convention:
    /// `detail`, then `error`, then `"API error: <status>"`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 401/403: the token is missing, expired or lacks the permission.
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// 404 from an endpoint addressing a specific job, report, brand or lead.
    #[error("{message}")]
    NotFound { message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status for errors that carry one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Unauthorized { status, .. } => {
                Some(*status)
            }
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::Deserialize { .. } | ApiError::InvalidUrl { .. } => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Classifies a non-2xx response.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(status, body);
        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            404 => ApiError::NotFound { message },
            _ => ApiError::Status { status, message },
        }
    }
}

/// Extracts the operator-facing message from an error response body.
///
/// `detail` wins over `error`; a non-string `detail` (validation error
/// lists) is rendered as JSON. Falls back to `"API error: <status>"`.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = |name: &str| -> Option<String> {
        match parsed.as_ref()?.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    };
    field("detail")
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("API error: {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_takes_precedence_over_error() {
        let msg = error_message(400, r#"{"detail":"bad sheet","error":"other"}"#);
        assert_eq!(msg, "bad sheet");
    }

    #[test]
    fn error_field_used_without_detail() {
        assert_eq!(error_message(500, r#"{"error":"boom"}"#), "boom");
    }

    #[test]
    fn null_detail_falls_through_to_error() {
        assert_eq!(error_message(500, r#"{"detail":null,"error":"boom"}"#), "boom");
    }

    #[test]
    fn non_json_body_uses_status_fallback() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "API error: 502");
        assert_eq!(error_message(404, ""), "API error: 404");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let msg = error_message(422, r#"{"detail":[{"loc":["body","queries"],"msg":"field required"}]}"#);
        assert!(msg.contains("field required"), "got: {msg}");
    }

    #[test]
    fn from_status_classifies_auth_and_missing() {
        assert!(matches!(
            ApiError::from_status(401, r#"{"detail":"Invalid token"}"#),
            ApiError::Unauthorized { status: 401, ref message } if message == "Invalid token"
        ));
        assert!(matches!(
            ApiError::from_status(403, ""),
            ApiError::Unauthorized { status: 403, .. }
        ));
        let missing = ApiError::from_status(404, r#"{"detail":"Job not found"}"#);
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "Job not found");
    }

    #[test]
    fn auth_error_displays_backend_message_only() {
        let err = ApiError::from_status(401, r#"{"detail":"Invalid token"}"#);
        assert_eq!(err.to_string(), "Invalid token");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn status_error_displays_backend_message() {
        let err = ApiError::from_status(500, r#"{"error":"provider quota exceeded"}"#);
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "provider quota exceeded");
    }
}
