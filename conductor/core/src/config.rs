//! Configuration
//!
//! [`NavaConfig`] is built in three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`$NAVA_CONFIG`, else `<config_dir>/nava/config.toml`)
//! 3. Environment variables
//!
//! Environment variables:
//! - `NAVA_API_URL`: base origin of the auth and completion API
//! - `NAVA_TOKEN_KEY`: file name the session token is stored under
//! - `NAVA_DATA_DIR`: directory holding the token file
//! - `NAVA_REQUEST_TIMEOUT`: HTTP timeout in seconds
//! - `NAVA_REVEAL_CHAR_MS`: typewriter delay per character
//! - `NAVA_REVEAL_PAUSE_MS`: typewriter delay after `.`, `!` or `?`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default API origin
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default storage key for the session token
pub const DEFAULT_TOKEN_KEY: &str = "nava-token";

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavaConfig {
    /// Base origin for `/auth/*` and `/openrouter`
    pub api_base_url: String,
    /// Storage key (file name) for the session token
    pub token_key: String,
    /// Directory for the token file (None = platform data dir)
    pub token_dir: Option<PathBuf>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Typewriter delay per character in milliseconds
    pub reveal_char_ms: u64,
    /// Typewriter delay after a sentence terminator in milliseconds
    pub reveal_sentence_pause_ms: u64,
    /// How long the "copied" flag stays set in milliseconds
    pub copy_reset_ms: u64,
    /// Interval between intro taglines in milliseconds
    pub tagline_interval_ms: u64,
}

impl Default for NavaConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            token_dir: None,
            request_timeout_secs: 120,
            reveal_char_ms: 80,
            reveal_sentence_pause_ms: 250,
            copy_reset_ms: 1000,
            tagline_interval_ms: 2500,
        }
    }
}

impl NavaConfig {
    /// Defaults with environment overrides (no config file)
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("NAVA_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(key) = lookup("NAVA_TOKEN_KEY").filter(|v| !v.trim().is_empty()) {
            self.token_key = key.trim().to_string();
        }
        if let Some(dir) = lookup("NAVA_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.token_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = lookup("NAVA_REQUEST_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = secs;
        }
        if let Some(ms) = lookup("NAVA_REVEAL_CHAR_MS").and_then(|v| v.parse().ok()) {
            self.reveal_char_ms = ms;
        }
        if let Some(ms) = lookup("NAVA_REVEAL_PAUSE_MS").and_then(|v| v.parse().ok()) {
            self.reveal_sentence_pause_ms = ms;
        }
    }

    /// Full path of the token file
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        let dir = self.token_dir.clone().unwrap_or_else(default_data_dir);
        dir.join(&self.token_key)
    }

    /// HTTP request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Typewriter delay per character
    #[must_use]
    pub fn reveal_char_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_char_ms)
    }

    /// Typewriter delay after a sentence terminator
    #[must_use]
    pub fn reveal_sentence_pause(&self) -> Duration {
        Duration::from_millis(self.reveal_sentence_pause_ms)
    }

    /// Lifetime of the "copied" flag
    #[must_use]
    pub fn copy_reset(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }

    /// Interval between intro taglines
    #[must_use]
    pub fn tagline_interval(&self) -> Duration {
        Duration::from_millis(self.tagline_interval_ms)
    }
}

/// Platform data directory for Nava (`~/.local/share/nava` on Linux)
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("nava")
}

/// Default config file path
///
/// `$NAVA_CONFIG` if set, otherwise `<config_dir>/nava/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NAVA_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("nava").join("config.toml"))
}

/// Load configuration from the default file location plus environment
///
/// A missing file is not an error.
pub fn load_config() -> Result<NavaConfig, ConfigError> {
    let mut config = match default_config_path() {
        Some(path) => load_config_from_path(&path)?,
        None => NavaConfig::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Load configuration from a TOML file (no environment overrides)
///
/// Returns defaults if the file does not exist.
pub fn load_config_from_path(path: &Path) -> Result<NavaConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(NavaConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Loaded config file");
    Ok(config)
}
