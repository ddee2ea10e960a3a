//! HTTP Backend Implementation
//!
//! Talks to the Nava API over HTTP:
//!
//! - `GET  /auth/me`     identity for a bearer token
//! - `POST /auth/login`  credentials to token + identity
//! - `POST /openrouter`  conversation to assistant reply
//!
//! Non-success statuses become [`ApiError::Status`] carrying the `detail`
//! field of the error body when there is one.

use async_trait::async_trait;

use super::traits::{
    ApiBackend, AuthBackend, CompletionBackend, CompletionRequest, CompletionResponse,
    IdentityResponse, LoginRequest, LoginResponse,
};
use crate::config::NavaConfig;
use crate::error::ApiError;
use crate::messages::{ChatMessage, UserIdentity};

/// HTTP client for the Nava API
#[derive(Clone, Debug)]
pub struct HttpBackend {
    /// Base origin without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend for `base_url` with the given request timeout
    pub fn new(
        base_url: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &NavaConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    /// Base origin
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an error, reading `detail` if present
    async fn status_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ApiError::Status {
            status,
            detail: extract_detail(&body),
        }
    }
}

/// Pull a string `detail` field out of an error body
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn fetch_identity(&self, token: &str) -> Result<UserIdentity, ApiError> {
        let response = self
            .http_client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: IdentityResponse = response.json().await?;
        body.user
            .ok_or_else(|| ApiError::Malformed("identity response has no user".to_string()))
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(&self, messages: &[ChatMessage], token: &str) -> Result<String, ApiError> {
        let response = self
            .http_client
            .post(self.url("/openrouter"))
            .bearer_auth(token)
            .json(&CompletionRequest { messages })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: CompletionResponse = response.json().await?;
        body.content
            .ok_or_else(|| ApiError::Malformed("completion response has no content".to_string()))
    }
}

impl ApiBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_http_backend_trims_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.url("/auth/me"), "http://localhost:8000/auth/me");
    }

    #[test]
    fn test_from_config() {
        let backend = HttpBackend::from_config(&NavaConfig::default()).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_extract_detail() {
        assert_eq!(
            extract_detail(r#"{"detail":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        // FastAPI validation errors carry a list, not a string
        assert_eq!(extract_detail(r#"{"detail":[{"msg":"field required"}]}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
        assert_eq!(extract_detail(""), None);
    }
}
