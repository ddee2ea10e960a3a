//! Conductor Messages
//!
//! Conversation data types and the messages sent from the Conductor to UI
//! surfaces.
//!
//! # Design Philosophy
//!
//! The Conductor owns the conversation, the session and the login form
//! state. Surfaces are pure renderers: they mirror what the Conductor tells
//! them and forward user actions back as [`crate::SurfaceEvent`]s.

use serde::{Deserialize, Serialize};

/// Prefix of the synthetic assistant message shown when a completion fails
pub const ERROR_PREFIX: &str = "⚠️ Error: ";

/// Who authored a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The person at the keyboard
    User,
    /// The completion endpoint
    Assistant,
}

impl MessageRole {
    /// Speaker name shown in front of the message
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Nava",
        }
    }

    /// Whether messages of this role are revealed with the typewriter
    #[must_use]
    pub fn reveals(self) -> bool {
        match self {
            Self::User => false,
            Self::Assistant => true,
        }
    }
}

/// A message in the conversation
///
/// Immutable once appended. Its identity is its position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: MessageRole,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Create the assistant placeholder for a failed completion
    pub fn assistant_error(error: impl std::fmt::Display) -> Self {
        Self::assistant(format!("{ERROR_PREFIX}{error}"))
    }
}

/// Identity of the logged-in user, as reported by the auth service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Username, if the account has one
    #[serde(default)]
    pub username: Option<String>,
    /// Email address, if known
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    /// Name to show: username, else email
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.email.as_deref().filter(|e| !e.is_empty()))
    }
}

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Conductor operational state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductorState {
    /// Not started yet
    Initializing,
    /// Idle, accepting input
    Ready,
    /// Waiting for the completion endpoint
    Thinking,
    /// Shutting down
    ShuttingDown,
}

impl ConductorState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Initializing => "Starting up...",
            Self::Ready => "Ready",
            Self::Thinking => "Thinking...",
            Self::ShuttingDown => "Shutting down...",
        }
    }

    /// Whether a completion request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Thinking)
    }
}

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // Conversation
    // ============================================
    /// A message was appended to the conversation
    Message {
        /// Position in the conversation
        index: usize,
        /// Who sent it
        role: MessageRole,
        /// Full content
        content: String,
    },

    /// The conversation was emptied
    ConversationCleared,

    /// Scroll to the newest entry
    ScrollToBottom,

    /// The submitted input was accepted; clear the input box
    ClearInput,

    // ============================================
    // Session
    // ============================================
    /// Login state changed
    SessionInfo {
        /// Resolved identity, if any
        identity: Option<UserIdentity>,
        /// Identity present or token stored
        logged_in: bool,
    },

    /// Show the login form
    AuthModalOpened,

    /// Login form progress changed
    AuthModalUpdated {
        /// Request in flight
        loading: bool,
        /// Error to show under the form
        error: Option<String>,
    },

    /// Hide the login form and discard its input
    AuthModalClosed,

    // ============================================
    // System
    // ============================================
    /// Operational state changed
    State {
        /// New state
        state: ConductorState,
    },

    /// Intro tagline to show under the title
    Tagline {
        /// Tagline text
        text: String,
    },

    /// Transient notification
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Text
        message: String,
    },

    /// Conductor is shutting down
    Quit,
}
