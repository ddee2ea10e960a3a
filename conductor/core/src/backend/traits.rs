//! API Backend Traits
//!
//! Trait definitions for the two external collaborators: the auth service
//! and the completion service. The Conductor only talks to these traits, so
//! tests can substitute an in-process mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::messages::{ChatMessage, UserIdentity};

/// Body of `POST /auth/login`
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Success body of `POST /auth/login`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for later calls
    #[serde(default)]
    pub access_token: Option<String>,
    /// The account that logged in
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

/// Success body of `GET /auth/me`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IdentityResponse {
    /// The account the token belongs to
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

/// Body of `POST /openrouter`
#[derive(Clone, Debug, Serialize)]
pub struct CompletionRequest<'a> {
    /// Full conversation, oldest first
    pub messages: &'a [ChatMessage],
}

/// Success body of `POST /openrouter`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompletionResponse {
    /// Assistant reply
    #[serde(default)]
    pub content: Option<String>,
}

/// Auth service
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token and identity
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Resolve the identity a token belongs to
    async fn fetch_identity(&self, token: &str) -> Result<UserIdentity, ApiError>;
}

/// Completion service
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the conversation and get the assistant reply
    ///
    /// `token` may be empty when logged out; it is still sent as a bearer
    /// header so the server decides.
    async fn complete(&self, messages: &[ChatMessage], token: &str) -> Result<String, ApiError>;
}

/// Everything the Conductor needs from the outside world
pub trait ApiBackend: AuthBackend + CompletionBackend {
    /// Backend name for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest {
            email: "a@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn test_completion_request_shape() {
        let messages = vec![ChatMessage::user("hello"), ChatMessage::assistant("hi")];
        let json = serde_json::to_value(CompletionRequest {
            messages: &messages,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn test_login_response_tolerates_missing_fields() {
        let resp: LoginResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, LoginResponse::default());

        let resp: LoginResponse = serde_json::from_str(
            r#"{"access_token":"t","user":{"username":"akash"},"token_type":"bearer"}"#,
        )
        .unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("t"));
        assert_eq!(
            resp.user.and_then(|u| u.username),
            Some("akash".to_string())
        );
    }
}
