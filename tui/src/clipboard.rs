//! Clipboard Access
//!
//! Copying a reply is a side effect the message list triggers but does not
//! own. The [`Clipboard`] trait lets tests record copies instead of touching
//! the system clipboard.

use thiserror::Error;

/// Clipboard failure
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard on this system (headless session, no display server)
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard refused the text
    #[error("failed to copy: {0}")]
    Write(String),
}

/// Something text can be copied to
pub trait Clipboard {
    /// Replace the clipboard contents
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via arboard
///
/// The handle is kept for the life of the app; on Wayland the contents
/// vanish when it is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Open the system clipboard lazily on first copy
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("not initialized".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Clipboard that remembers what was copied
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    /// Every copy, oldest first
    pub copies: Vec<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.copies.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.set_text("one").unwrap();
        clipboard.set_text("two").unwrap();
        assert_eq!(clipboard.copies, vec!["one", "two"]);
    }
}
