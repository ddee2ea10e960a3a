//! Session Management
//!
//! Tracks who is logged in: the persisted token (through a [`TokenStore`])
//! and the identity resolved from it.
//!
//! # Invariants
//!
//! - A stored token triggers an identity lookup on bootstrap.
//! - An identity is only accepted for the token currently stored. A lookup
//!   that finishes after logout or re-login is discarded.
//! - Lookup failures of any kind mean "logged out" and are never surfaced.

use crate::error::{ApiError, TokenStoreError};
use crate::messages::UserIdentity;
use crate::token_store::TokenStore;

/// Login session state
pub struct Session<S: TokenStore> {
    /// Where the token lives
    store: S,
    /// Identity resolved from the token (memory only)
    identity: Option<UserIdentity>,
}

impl<S: TokenStore> Session<S> {
    /// Create a session over a token store
    pub fn new(store: S) -> Self {
        Self {
            store,
            identity: None,
        }
    }

    /// Currently stored token
    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    /// Resolved identity
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// Identity present or token stored
    ///
    /// The two can disagree while a lookup is pending; either is enough.
    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some() || self.store.get().is_some()
    }

    /// Start of bootstrap: the token whose identity must be looked up
    pub fn bootstrap(&mut self) -> Option<String> {
        let token = self.store.get();
        if token.is_none() {
            self.identity = None;
        }
        token
    }

    /// Apply the result of an identity lookup for `token`
    ///
    /// Returns `false` if the result was discarded as stale.
    pub fn apply_identity(&mut self, token: &str, result: Result<UserIdentity, ApiError>) -> bool {
        if self.store.get().as_deref() != Some(token) {
            tracing::debug!("Discarding identity for a token that is no longer stored");
            return false;
        }

        match result {
            Ok(identity) => {
                tracing::info!("Session identity resolved");
                self.identity = Some(identity);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Identity lookup failed, treating as logged out");
                self.identity = None;
            }
        }
        true
    }

    /// Persist a freshly issued token and adopt the reported identity
    ///
    /// With no reported identity the session stays logged in by token until
    /// a lookup resolves it.
    pub fn login_succeeded(
        &mut self,
        token: &str,
        identity: Option<UserIdentity>,
    ) -> Result<(), TokenStoreError> {
        self.store.set(token)?;
        self.identity = identity;
        Ok(())
    }

    /// Forget the token and the identity (no network call)
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to remove stored token");
        }
        self.identity = None;
    }
}
