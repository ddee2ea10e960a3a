//! Message List State
//!
//! Per-message presentation state for the conversation: the typewriter
//! reveal of the newest assistant reply and the short-lived "copied" flag.
//!
//! # Reveal
//!
//! ```text
//!   appended ──▶ revealing ──(last char)──▶ complete
//!                    │
//!                    └──(new message / clear / skip)──▶ complete
//! ```
//!
//! Only one reveal runs at a time. A finished message is shown from its
//! stored content and is never replayed. Everything is driven by the frame
//! clock through [`MessageListState::update`].

use std::collections::HashMap;
use std::time::Duration;

use nava_core::{MessageRole, NavaConfig};

use crate::clipboard::{Clipboard, ClipboardError};

/// Typewriter pacing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTiming {
    /// Delay before each character
    pub char_interval: Duration,
    /// Delay after `.`, `!` or `?`
    pub sentence_pause: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            char_interval: Duration::from_millis(80),
            sentence_pause: Duration::from_millis(250),
        }
    }
}

impl RevealTiming {
    /// Pacing from configuration
    pub fn from_config(config: &NavaConfig) -> Self {
        Self {
            char_interval: config.reveal_char_interval(),
            sentence_pause: config.reveal_sentence_pause(),
        }
    }

    /// Same delay for every character
    pub fn fixed(interval: Duration) -> Self {
        Self {
            char_interval: interval,
            sentence_pause: interval,
        }
    }

    /// Delay before the character following `c`
    pub fn delay_after(&self, c: char) -> Duration {
        if matches!(c, '.' | '!' | '?') {
            self.sentence_pause
        } else {
            self.char_interval
        }
    }
}

/// A running reveal
#[derive(Clone, Debug)]
struct RevealHandle {
    /// Conversation index being revealed
    index: usize,
    /// Full text
    content: String,
    /// Byte length shown so far (always on a char boundary)
    shown: usize,
    /// Time left before the next character
    until_next: Duration,
}

impl RevealHandle {
    fn is_complete(&self) -> bool {
        self.shown >= self.content.len()
    }

    /// Show one more character; returns it
    fn advance(&mut self) -> Option<char> {
        let c = self.content[self.shown..].chars().next()?;
        self.shown += c.len_utf8();
        Some(c)
    }

    fn visible(&self) -> &str {
        &self.content[..self.shown]
    }
}

/// Reveal and copy state for the conversation
#[derive(Debug)]
pub struct MessageListState {
    timing: RevealTiming,
    copy_reset: Duration,
    reveal: Option<RevealHandle>,
    /// Index -> time left on its "copied" flag
    copied: HashMap<usize, Duration>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new(RevealTiming::default(), Duration::from_secs(1))
    }
}

impl MessageListState {
    /// Create with explicit pacing
    pub fn new(timing: RevealTiming, copy_reset: Duration) -> Self {
        Self {
            timing,
            copy_reset,
            reveal: None,
            copied: HashMap::new(),
        }
    }

    /// Create from configuration
    pub fn from_config(config: &NavaConfig) -> Self {
        Self::new(RevealTiming::from_config(config), config.copy_reset())
    }

    /// A message was appended; assistant replies start a reveal
    ///
    /// Any append finishes the running reveal, so a new send shows the
    /// previous reply in full.
    pub fn on_message_appended(&mut self, index: usize, role: MessageRole, content: &str) {
        if let Some(previous) = self.reveal.take() {
            tracing::trace!(index = previous.index, "Reveal superseded");
        }
        if !role.reveals() {
            return;
        }
        self.reveal = Some(RevealHandle {
            index,
            content: content.to_string(),
            shown: 0,
            until_next: Duration::ZERO,
        });
    }

    /// The conversation was emptied
    pub fn on_cleared(&mut self) {
        self.reveal = None;
        self.copied.clear();
    }

    /// Advance reveal and copy timers
    pub fn update(&mut self, delta: Duration) {
        self.copied.retain(|_, left| {
            *left = left.saturating_sub(delta);
            !left.is_zero()
        });

        let Some(handle) = self.reveal.as_mut() else {
            return;
        };

        let mut budget = delta;
        while !handle.is_complete() {
            if budget < handle.until_next {
                handle.until_next -= budget;
                break;
            }
            budget -= handle.until_next;
            match handle.advance() {
                Some(c) => handle.until_next = self.timing.delay_after(c),
                None => break,
            }
        }

        if handle.is_complete() {
            self.reveal = None;
        }
    }

    /// Text to draw for the message at `index`
    pub fn display_text<'a>(&'a self, index: usize, content: &'a str) -> &'a str {
        match &self.reveal {
            Some(handle) if handle.index == index => handle.visible(),
            _ => content,
        }
    }

    /// Whether the message at `index` is mid-reveal
    pub fn is_revealing_index(&self, index: usize) -> bool {
        self.reveal.as_ref().is_some_and(|h| h.index == index)
    }

    /// Whether any reveal is running
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Finish the current reveal immediately
    pub fn skip_reveal(&mut self) {
        self.reveal = None;
    }

    /// Copy a message to the clipboard and flag it
    ///
    /// The flag is set only if the copy succeeded.
    pub fn copy(
        &mut self,
        index: usize,
        content: &str,
        clipboard: &mut dyn Clipboard,
    ) -> Result<(), ClipboardError> {
        clipboard.set_text(content)?;
        self.copied.insert(index, self.copy_reset);
        Ok(())
    }

    /// Whether the "copied" flag is set for `index`
    pub fn is_copied(&self, index: usize) -> bool {
        self.copied.contains_key(&index)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn state() -> MessageListState {
        MessageListState::new(RevealTiming::default(), ms(1000))
    }

    #[test]
    fn test_user_messages_never_reveal() {
        let mut list = state();
        list.on_message_appended(0, MessageRole::User, "hello");
        assert!(!list.is_revealing());
        assert_eq!(list.display_text(0, "hello"), "hello");
    }

    #[test]
    fn test_reveal_starts_empty() {
        let mut list = state();
        list.on_message_appended(1, MessageRole::Assistant, "Hi");
        assert_eq!(list.display_text(1, "Hi"), "");

        list.update(Duration::ZERO);
        assert_eq!(list.display_text(1, "Hi"), "H");

        list.update(ms(79));
        assert_eq!(list.display_text(1, "Hi"), "H");
    }

    #[test]
    fn test_reveal_runs_to_completion() {
        let mut list = state();
        list.on_message_appended(1, MessageRole::Assistant, "Hi");

        list.update(Duration::ZERO);
        list.update(ms(80));
        assert!(!list.is_revealing());
        assert_eq!(list.display_text(1, "Hi"), "Hi");

        // No replay afterwards
        list.update(ms(500));
        assert_eq!(list.display_text(1, "Hi"), "Hi");
    }

    #[test]
    fn test_sentence_pause() {
        let mut list = state();
        list.on_message_appended(0, MessageRole::Assistant, "Ok. Go");

        list.update(Duration::ZERO);
        list.update(ms(80));
        assert_eq!(list.display_text(0, "Ok. Go"), "Ok");
        list.update(ms(80));
        assert_eq!(list.display_text(0, "Ok. Go"), "Ok.");

        list.update(ms(200));
        assert_eq!(list.display_text(0, "Ok. Go"), "Ok.");
        list.update(ms(50));
        assert_eq!(list.display_text(0, "Ok. Go"), "Ok. ");
    }

    #[test]
    fn test_fixed_timing() {
        let mut list = MessageListState::new(RevealTiming::fixed(ms(10)), ms(1000));
        list.on_message_appended(0, MessageRole::Assistant, "a.b");
        list.update(ms(20));
        assert_eq!(list.display_text(0, "a.b"), "a.b");
    }

    #[test]
    fn test_reveal_handles_multibyte() {
        let mut list = state();
        let text = "⚡é!";
        list.on_message_appended(0, MessageRole::Assistant, text);
        list.update(Duration::ZERO);
        assert_eq!(list.display_text(0, text), "⚡");
        list.update(ms(80));
        assert_eq!(list.display_text(0, text), "⚡é");
    }

    #[test]
    fn test_new_reveal_cancels_previous() {
        let mut list = state();
        list.on_message_appended(1, MessageRole::Assistant, "first reply");
        list.update(Duration::ZERO);

        list.on_message_appended(3, MessageRole::Assistant, "second");
        assert_eq!(list.display_text(1, "first reply"), "first reply");
        assert!(list.is_revealing_index(3));
    }

    #[test]
    fn test_new_send_finishes_running_reveal() {
        let mut list = state();
        list.on_message_appended(0, MessageRole::User, "q1");
        list.on_message_appended(1, MessageRole::Assistant, "a long first reply");
        list.update(Duration::ZERO);
        assert_eq!(list.display_text(1, "a long first reply"), "a");

        list.on_message_appended(2, MessageRole::User, "q2");
        assert!(!list.is_revealing());
        assert_eq!(
            list.display_text(1, "a long first reply"),
            "a long first reply"
        );
    }

    #[test]
    fn test_clear_cancels_reveal() {
        let mut list = state();
        list.on_message_appended(0, MessageRole::Assistant, "text");
        list.on_cleared();
        assert!(!list.is_revealing());
    }

    #[test]
    fn test_skip_reveal() {
        let mut list = state();
        list.on_message_appended(0, MessageRole::Assistant, "long reply");
        list.skip_reveal();
        assert_eq!(list.display_text(0, "long reply"), "long reply");
    }

    #[test]
    fn test_copy_flag_resets() {
        let mut list = state();
        let mut clipboard = MemoryClipboard::default();

        list.copy(1, "reply", &mut clipboard).unwrap();
        assert!(list.is_copied(1));
        assert!(!list.is_copied(0));
        assert_eq!(clipboard.copies, vec!["reply"]);

        list.update(ms(999));
        assert!(list.is_copied(1));
        list.update(ms(1));
        assert!(!list.is_copied(1));
    }

    #[test]
    fn test_copy_is_idempotent() {
        let mut list = state();
        let mut clipboard = MemoryClipboard::default();

        list.copy(1, "reply", &mut clipboard).unwrap();
        list.update(ms(600));
        list.copy(1, "reply", &mut clipboard).unwrap();
        list.update(ms(600));

        assert!(list.is_copied(1));
        assert_eq!(clipboard.copies.len(), 2);
    }
}
