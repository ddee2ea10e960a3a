//! Error Types
//!
//! Typed errors for the three failure domains of the core:
//!
//! - [`ApiError`]: outbound HTTP calls (identity, login, completion)
//! - [`TokenStoreError`]: persisting the session token
//! - [`ConfigError`]: loading the configuration file
//!
//! None of these are fatal at runtime. The conductor downgrades every
//! [`ApiError`] into a normal, continuable UI state.

use std::path::PathBuf;

use thiserror::Error;

/// Fallback text shown when the server gives no usable reason
pub const GENERIC_FAILURE: &str = "Something went wrong.";

/// Failure of an outbound API call
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Network or transport failure (connection refused, timeout, ...)
    #[error("{0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("request failed with status {status}{}", detail_suffix(.detail))]
    Status {
        /// HTTP status code
        status: u16,
        /// `detail` field from the error body, if the server sent one
        detail: Option<String>,
    },

    /// Response body was missing a field or was not valid JSON
    #[error("malformed response: {0}")]
    Malformed(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Server-provided detail message, if any
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref().filter(|d| !d.trim().is_empty()),
            _ => None,
        }
    }

    /// Text suitable for showing inline in the login form
    #[must_use]
    pub fn user_message(&self) -> &str {
        self.detail().unwrap_or(GENERIC_FAILURE)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Failure reading or writing the persisted token
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Filesystem error on the token file
    #[error("token store I/O error at {}: {source}", .path.display())]
    Io {
        /// Token file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Failure loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::NavaConfig`]
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
}
