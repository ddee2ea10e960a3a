//! Auth Modal
//!
//! State machine for the login form. The form's text buffers live in the
//! surface; this tracks visibility, the in-flight flag and the error line.
//!
//! ```text
//!   Closed ──open──▶ Open ──submit──▶ Open+loading ──ok──▶ Closed
//!     ▲               │  ▲                  │
//!     └────cancel─────┘  └──────error───────┘
//! ```

use crate::backend::LoginRequest;
use crate::error::{ApiError, GENERIC_FAILURE};

/// Error shown when a required field is empty
pub const MISSING_FIELDS: &str = "Email and password are required.";

/// Why a submit did not start a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Form is not open
    Closed,
    /// A request is already in flight
    InFlight,
    /// Email or password empty
    MissingFields,
}

/// Login form state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthModal {
    open: bool,
    loading: bool,
    error: Option<String>,
}

impl AuthModal {
    /// Closed form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the form is visible
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a login request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error line under the form
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show the form with a clean error line
    pub fn open(&mut self) {
        self.open = true;
        self.loading = false;
        self.error = None;
    }

    /// Close without side effects
    pub fn cancel(&mut self) {
        self.open = false;
        self.loading = false;
        self.error = None;
    }

    /// Validate the fields and move to loading
    ///
    /// The email is trimmed; the password is sent as typed.
    pub fn begin_submit(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<LoginRequest, SubmitRejection> {
        if !self.open {
            return Err(SubmitRejection::Closed);
        }
        if self.loading {
            return Err(SubmitRejection::InFlight);
        }

        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.error = Some(MISSING_FIELDS.to_string());
            return Err(SubmitRejection::MissingFields);
        }

        self.loading = true;
        self.error = None;
        Ok(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Login succeeded: close
    pub fn succeed(&mut self) {
        self.cancel();
    }

    /// Login failed: stay open with the server's reason or the fallback
    pub fn fail(&mut self, error: &ApiError) {
        self.fail_with(error.user_message());
    }

    /// Login failed with a specific message
    pub fn fail_with(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(if message.is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message.to_string()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_modal() -> AuthModal {
        let mut modal = AuthModal::new();
        modal.open();
        modal
    }

    #[test]
    fn test_submit_requires_open() {
        let mut modal = AuthModal::new();
        assert_eq!(
            modal.begin_submit("a@b.c", "pw").unwrap_err(),
            SubmitRejection::Closed
        );
    }

    #[test]
    fn test_submit_requires_fields() {
        let mut modal = open_modal();
        assert_eq!(
            modal.begin_submit("   ", "pw").unwrap_err(),
            SubmitRejection::MissingFields
        );
        assert_eq!(modal.error(), Some(MISSING_FIELDS));
        assert!(!modal.is_loading());

        assert_eq!(
            modal.begin_submit("a@b.c", "").unwrap_err(),
            SubmitRejection::MissingFields
        );
    }

    #[test]
    fn test_submit_moves_to_loading() {
        let mut modal = open_modal();
        modal.fail_with("old error");

        let request = modal.begin_submit("  a@b.c ", " pw ").unwrap();
        assert_eq!(request.email, "a@b.c");
        assert_eq!(request.password, " pw ");
        assert!(modal.is_loading());
        assert_eq!(modal.error(), None);

        assert_eq!(
            modal.begin_submit("a@b.c", "pw").unwrap_err(),
            SubmitRejection::InFlight
        );
    }

    #[test]
    fn test_fail_shows_detail_and_stays_open() {
        let mut modal = open_modal();
        modal.begin_submit("a@b.c", "wrong").unwrap();
        modal.fail(&ApiError::Status {
            status: 401,
            detail: Some("Invalid email or password".to_string()),
        });

        assert!(modal.is_open());
        assert!(!modal.is_loading());
        assert_eq!(modal.error(), Some("Invalid email or password"));
    }

    #[test]
    fn test_fail_without_detail_uses_fallback() {
        let mut modal = open_modal();
        modal.begin_submit("a@b.c", "pw").unwrap();
        modal.fail(&ApiError::Transport("connection refused".to_string()));
        assert_eq!(modal.error(), Some(GENERIC_FAILURE));
    }

    #[test]
    fn test_succeed_closes() {
        let mut modal = open_modal();
        modal.begin_submit("a@b.c", "pw").unwrap();
        modal.succeed();
        assert_eq!(modal, AuthModal::new());
    }

    #[test]
    fn test_reopen_clears_error() {
        let mut modal = open_modal();
        modal.fail_with("nope");
        modal.cancel();
        modal.open();
        assert_eq!(modal.error(), None);
    }
}
