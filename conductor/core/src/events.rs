//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces report what the
//! user did; the Conductor decides what it means.

use serde::{Deserialize, Serialize};

/// Events from UI Surface to Conductor
#[derive(Clone, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Surface attached; Conductor replies with current state
    Connected,

    /// User submitted the input box
    UserMessage {
        /// Raw input text
        content: String,
    },

    /// User pressed Clear
    ClearConversation,

    /// Navbar "Login" chosen
    LoginRequested,

    /// Navbar "Logout" chosen
    LogoutRequested,

    /// Login form submitted
    LoginSubmitted {
        /// Email field
        email: String,
        /// Password field
        password: String,
    },

    /// Login form cancelled or closed
    LoginCancelled,

    /// User wants to quit
    QuitRequested,
}

impl std::fmt::Debug for SurfaceEvent {
    // Keeps passwords out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => f.write_str("Connected"),
            Self::UserMessage { content } => f
                .debug_struct("UserMessage")
                .field("len", &content.len())
                .finish(),
            Self::ClearConversation => f.write_str("ClearConversation"),
            Self::LoginRequested => f.write_str("LoginRequested"),
            Self::LogoutRequested => f.write_str("LogoutRequested"),
            Self::LoginSubmitted { email, .. } => f
                .debug_struct("LoginSubmitted")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::LoginCancelled => f.write_str("LoginCancelled"),
            Self::QuitRequested => f.write_str("QuitRequested"),
        }
    }
}
