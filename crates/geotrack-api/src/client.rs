//! HTTP client for the GEO Tracker backend.
//!
//! Wraps `reqwest` with the backend's error convention, optional bearer
//! authentication, and typed response deserialization. Endpoint methods live
//! in [`crate::runs`], [`crate::content`] and [`crate::admin`].

use std::time::Duration;

use geotrack_core::{AppConfig, HealthStatus};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// Client for the GEO Tracker REST API.
///
/// Use [`ApiClient::from_config`] in the binary or [`ApiClient::new`] to
/// point at a mock server in tests. Cloning is cheap; clones share the
/// connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates an unauthenticated client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::InvalidUrl`] if `base_url`
    /// is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so endpoint segments append to any
        // path prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
        })
    }

    /// Creates a client from the application configuration, including the
    /// environment token if one is set.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_token(config.api_token.clone()))
    }

    /// Sets the bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Status`] on a non-2xx response.
    /// - [`ApiError::Deserialize`] if the body does not match.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"], &[]);
        self.get_json(url, "health").await
    }

    /// Builds an endpoint URL under the base URL.
    ///
    /// Each segment is percent-encoded, so identifiers containing `/` or `?`
    /// cannot escape their path position.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ApiError> {
        self.send_json(self.client.get(url), context).await
    }

    pub(crate) async fn post_json<B, T>(
        &self,
        url: Url,
        body: Option<&B>,
        context: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(url);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        self.send_json(request, context).await
    }

    pub(crate) async fn patch_json<B, T>(
        &self,
        url: Url,
        body: &B,
        context: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.client.patch(url).json(body), context).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ApiError> {
        self.send_json(self.client.delete(url), context).await
    }

    /// Sends the request, maps non-2xx responses through the backend error
    /// convention, and parses the body as `T`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Unauthorized`], [`ApiError::NotFound`] or
    ///   [`ApiError::Status`] on a non-2xx response.
    /// - [`ApiError::Deserialize`] if the body does not match `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &body);
            tracing::debug!(context, status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }

        // Some mutation endpoints answer 204 or an empty 200.
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
