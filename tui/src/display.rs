//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Conductor tells it to.
//! Display state is the bridge between ConductorMessages and rendering.
//!
//! - DisplayMessage: A rendered conversation message
//! - DisplayModal: The login form as last reported
//! - DisplayNotification: A transient status line message

use std::time::Duration;

use nava_core::{
    ConductorMessage, ConductorState, MessageRole, NavaConfig, NotifyLevel, UserIdentity,
};

use crate::message_list::MessageListState;

/// How long a notification stays on the status line
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Shown under the conversation while a reply is pending
pub const THINKING_TEXT: &str = "Nava is thinking...";

/// A rendered conversation message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Who sent this message
    pub role: MessageRole,
    /// The message content
    pub content: String,
}

impl DisplayMessage {
    /// Create a new display message
    pub fn new(role: MessageRole, content: String) -> Self {
        Self { role, content }
    }

    /// Label shown before the content
    pub fn prefix(&self) -> String {
        format!("{}: ", self.role.label())
    }
}

/// Login form as the Conductor last described it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayModal {
    /// Form visible
    pub open: bool,
    /// Request in flight
    pub loading: bool,
    /// Error line
    pub error: Option<String>,
}

/// A notification to display
#[derive(Clone, Debug)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Conversation messages
    pub messages: Vec<DisplayMessage>,
    /// Reveal and copy state
    pub list: MessageListState,
    /// Conductor state
    pub conductor_state: ConductorState,
    /// Resolved identity
    pub identity: Option<UserIdentity>,
    /// Identity present or token stored
    pub logged_in: bool,
    /// Login form
    pub modal: DisplayModal,
    /// Intro tagline
    pub tagline: Option<String>,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Assistant reply picked for copying (`None` means the newest)
    pub selected: Option<usize>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::with_list(MessageListState::default())
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with reveal and copy timing from configuration
    pub fn from_config(config: &NavaConfig) -> Self {
        Self::with_list(MessageListState::from_config(config))
    }

    fn with_list(list: MessageListState) -> Self {
        Self {
            messages: Vec::new(),
            list,
            conductor_state: ConductorState::Initializing,
            identity: None,
            logged_in: false,
            modal: DisplayModal::default(),
            tagline: None,
            notification: None,
            selected: None,
        }
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            // Conversation messages
            ConductorMessage::Message {
                index,
                role,
                content,
            } => {
                let local = self.messages.len();
                if index != local {
                    tracing::warn!(index, local, "Conversation out of sync");
                }
                self.list.on_message_appended(local, role, &content);
                self.messages.push(DisplayMessage::new(role, content));
            }
            ConductorMessage::ConversationCleared => {
                self.messages.clear();
                self.list.on_cleared();
                self.selected = None;
            }
            // A message was accepted; earlier notices no longer apply
            ConductorMessage::ClearInput => self.clear_notification(),
            ConductorMessage::ScrollToBottom => {
                // Scroll position belongs to the app
            }

            // Session messages
            ConductorMessage::SessionInfo {
                identity,
                logged_in,
            } => {
                self.identity = identity;
                self.logged_in = logged_in;
            }
            ConductorMessage::AuthModalOpened => {
                self.modal = DisplayModal {
                    open: true,
                    ..DisplayModal::default()
                };
            }
            ConductorMessage::AuthModalUpdated { loading, error } => {
                self.modal.loading = loading;
                self.modal.error = error;
            }
            ConductorMessage::AuthModalClosed => {
                self.modal = DisplayModal::default();
            }

            // System messages
            ConductorMessage::State { state } => {
                self.conductor_state = state;
            }
            ConductorMessage::Tagline { text } => {
                self.tagline = Some(text);
            }
            ConductorMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
            ConductorMessage::Quit => {
                // The app will handle quitting
            }
        }
    }

    /// Update timers and animations
    pub fn update(&mut self, delta: Duration) {
        self.list.update(delta);

        if let Some(ref mut notification) = self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Whether a reply is pending
    pub fn is_loading(&self) -> bool {
        self.conductor_state.is_loading()
    }

    /// Footer text for the logged-in user
    pub fn footer(&self) -> Option<String> {
        self.identity
            .as_ref()
            .and_then(UserIdentity::display_name)
            .map(|name| format!("Logged in as {name}"))
    }

    /// Newest assistant message and its index
    pub fn last_assistant(&self) -> Option<(usize, &DisplayMessage)> {
        self.messages
            .iter()
            .enumerate()
            .rev()
            .find(|(_, m)| m.role == MessageRole::Assistant)
    }

    /// Reply that a copy targets: the selection, else the newest
    pub fn copy_target(&self) -> Option<(usize, &DisplayMessage)> {
        match self.selected {
            Some(index) => self.messages.get(index).map(|m| (index, m)),
            None => self.last_assistant(),
        }
    }

    /// Move the selection to the next older assistant reply
    ///
    /// Starts from the newest reply when nothing is selected and stays on the
    /// oldest one.
    pub fn select_previous_reply(&mut self) {
        let before = self.selected.unwrap_or(self.messages.len());
        let found = self.assistant_indices().rev().find(|&i| i < before);
        if let Some(index) = found {
            self.selected = Some(index);
        }
    }

    /// Move the selection to the next newer reply; past the newest, deselect
    pub fn select_next_reply(&mut self) {
        let Some(current) = self.selected else {
            return;
        };
        let next = self.assistant_indices().find(|&i| i > current);
        self.selected = next;
    }

    fn assistant_indices(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role == MessageRole::Assistant)
            .map(|(i, _)| i)
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(index: usize, role: MessageRole, content: &str) -> ConductorMessage {
        ConductorMessage::Message {
            index,
            role,
            content: content.to_string(),
        }
    }

    // ========================================================================
    // DisplayMessage Tests
    // ========================================================================

    #[test]
    fn test_display_message_prefix() {
        assert_eq!(
            DisplayMessage::new(MessageRole::User, String::new()).prefix(),
            "You: "
        );
        assert_eq!(
            DisplayMessage::new(MessageRole::Assistant, String::new()).prefix(),
            "Nava: "
        );
    }

    // ========================================================================
    // DisplayState Tests
    // ========================================================================

    #[test]
    fn test_display_state_default() {
        let state = DisplayState::new();
        assert!(state.messages.is_empty());
        assert_eq!(state.conductor_state, ConductorState::Initializing);
        assert!(!state.logged_in);
        assert!(!state.modal.open);
        assert!(state.notification.is_none());
        assert!(state.tagline.is_none());
    }

    #[test]
    fn test_display_state_apply_message() {
        let mut state = DisplayState::new();
        state.apply_message(message(0, MessageRole::User, "Hello"));

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "Hello");
        assert!(!state.list.is_revealing());
    }

    #[test]
    fn test_display_state_assistant_message_reveals() {
        let mut state = DisplayState::new();
        state.apply_message(message(0, MessageRole::User, "Hello"));
        state.apply_message(message(1, MessageRole::Assistant, "Hi!"));

        assert!(state.list.is_revealing_index(1));
        assert_eq!(state.list.display_text(1, &state.messages[1].content), "");

        state.update(Duration::from_secs(5));
        assert_eq!(state.list.display_text(1, &state.messages[1].content), "Hi!");
    }

    #[test]
    fn test_display_state_cleared() {
        let mut state = DisplayState::new();
        state.apply_message(message(0, MessageRole::Assistant, "Hi"));
        state.apply_message(ConductorMessage::ConversationCleared);

        assert!(state.messages.is_empty());
        assert!(!state.list.is_revealing());
    }

    #[test]
    fn test_display_state_session_info() {
        let mut state = DisplayState::new();
        state.apply_message(ConductorMessage::SessionInfo {
            identity: Some(UserIdentity {
                username: None,
                email: Some("akash@example.com".to_string()),
            }),
            logged_in: true,
        });

        assert!(state.logged_in);
        assert_eq!(
            state.footer().as_deref(),
            Some("Logged in as akash@example.com")
        );
    }

    #[test]
    fn test_display_state_modal_lifecycle() {
        let mut state = DisplayState::new();
        state.apply_message(ConductorMessage::AuthModalOpened);
        assert!(state.modal.open);

        state.apply_message(ConductorMessage::AuthModalUpdated {
            loading: false,
            error: Some("Invalid credentials".to_string()),
        });
        assert_eq!(state.modal.error.as_deref(), Some("Invalid credentials"));

        state.apply_message(ConductorMessage::AuthModalClosed);
        assert_eq!(state.modal, DisplayModal::default());
    }

    #[test]
    fn test_display_state_conductor_state() {
        let mut state = DisplayState::new();
        state.apply_message(ConductorMessage::State {
            state: ConductorState::Thinking,
        });
        assert!(state.is_loading());

        state.apply_message(ConductorMessage::State {
            state: ConductorState::Ready,
        });
        assert!(!state.is_loading());
    }

    #[test]
    fn test_display_state_notification_expires() {
        let mut state = DisplayState::new();
        state.apply_message(ConductorMessage::Notify {
            level: NotifyLevel::Warning,
            message: "Slow down".to_string(),
        });

        let notif = state.notification.as_ref().unwrap();
        assert_eq!(notif.message, "Slow down");

        state.update(NOTIFICATION_TTL);
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_display_state_tagline() {
        let mut state = DisplayState::new();
        state.apply_message(ConductorMessage::Tagline {
            text: "Minimal. Smart. Fast.".to_string(),
        });
        assert_eq!(state.tagline.as_deref(), Some("Minimal. Smart. Fast."));
    }

    #[test]
    fn test_last_assistant() {
        let mut state = DisplayState::new();
        assert!(state.last_assistant().is_none());

        state.apply_message(message(0, MessageRole::User, "q1"));
        state.apply_message(message(1, MessageRole::Assistant, "a1"));
        state.apply_message(message(2, MessageRole::User, "q2"));

        let (index, msg) = state.last_assistant().unwrap();
        assert_eq!(index, 1);
        assert_eq!(msg.content, "a1");
    }

    #[test]
    fn test_selection_walks_assistant_replies() {
        let mut state = DisplayState::new();
        for (i, (role, text)) in [
            (MessageRole::User, "q1"),
            (MessageRole::Assistant, "a1"),
            (MessageRole::User, "q2"),
            (MessageRole::Assistant, "a2"),
        ]
        .into_iter()
        .enumerate()
        {
            state.apply_message(message(i, role, text));
        }
        assert_eq!(state.copy_target().map(|(i, _)| i), Some(3));

        state.select_previous_reply();
        assert_eq!(state.selected, Some(3));
        state.select_previous_reply();
        assert_eq!(state.selected, Some(1));
        assert_eq!(state.copy_target().map(|(_, m)| m.content.as_str()), Some("a1"));

        // Stays on the oldest
        state.select_previous_reply();
        assert_eq!(state.selected, Some(1));

        state.select_next_reply();
        assert_eq!(state.selected, Some(3));
        state.select_next_reply();
        assert_eq!(state.selected, None);
        assert_eq!(state.copy_target().map(|(i, _)| i), Some(3));
    }

    #[test]
    fn test_selection_reset_on_clear() {
        let mut state = DisplayState::new();
        state.apply_message(message(0, MessageRole::Assistant, "a"));
        state.select_previous_reply();
        assert_eq!(state.selected, Some(0));

        state.apply_message(ConductorMessage::ConversationCleared);
        assert_eq!(state.selected, None);
        assert!(state.copy_target().is_none());
    }

    #[test]
    fn test_accepted_message_clears_notification() {
        let mut state = DisplayState::new();
        state.apply_message(ConductorMessage::Notify {
            level: NotifyLevel::Error,
            message: "Clipboard unavailable".to_string(),
        });
        assert!(state.notification.is_some());

        state.apply_message(ConductorMessage::ClearInput);
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_new_send_finishes_reveal() {
        let mut state = DisplayState::new();
        state.apply_message(message(0, MessageRole::User, "q1"));
        state.apply_message(message(1, MessageRole::Assistant, "a long first reply"));
        state.update(Duration::ZERO);
        assert!(state.list.is_revealing());

        state.apply_message(message(2, MessageRole::User, "q2"));
        assert!(!state.list.is_revealing());
        assert_eq!(
            state.list.display_text(1, &state.messages[1].content),
            "a long first reply"
        );
    }
}
