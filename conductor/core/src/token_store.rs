//! Token Store
//!
//! Persists the single session token. The store is injected into the
//! [`crate::Session`] so tests can swap the file for memory.
//!
//! # Implementations
//!
//! - [`FileTokenStore`]: one file holding the raw token (production)
//! - [`MemoryTokenStore`]: in-process value (tests, headless runs)

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TokenStoreError;

/// Storage for at most one session token
///
/// An empty token is never stored: `set("")` behaves like `clear()`.
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored
    fn get(&self) -> Option<String>;

    /// Replace the stored token
    fn set(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token (no-op if absent)
    fn clear(&self) -> Result<(), TokenStoreError>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        (**self).set(token)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        (**self).clear()
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a token
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            value: Mutex::new((!token.is_empty()).then_some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.value.lock().clone()
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.value.lock() = (!token.is_empty()).then(|| token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.value.lock() = None;
        Ok(())
    }
}

/// File-backed token store
///
/// The file contains the raw token and nothing else. On Unix it is created
/// with mode 0600.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by `path` (the file need not exist)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to read token file");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        if token.is_empty() {
            return self.clear();
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only from the moment the file exists
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // `mode` only applies on creation; tighten a file left by older runs
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            file.set_permissions(perms).map_err(|e| self.io_error(e))?;
        }

        file.write_all(token.as_bytes())
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Token stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
