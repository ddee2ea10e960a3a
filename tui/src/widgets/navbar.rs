//! Navbar Widget
//!
//! Title on the left, the single login/logout action on the right.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::theme::{ACCENT_RED, DIM_GRAY, NAVA_INK};

/// What the navbar action does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Open the login form
    Login,
    /// Forget the session
    Logout,
}

impl NavAction {
    /// Action for the current login state
    pub fn for_state(logged_in: bool) -> Self {
        if logged_in {
            Self::Logout
        } else {
            Self::Login
        }
    }

    /// Button text
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Logout => "Logout",
        }
    }
}

/// Top bar
pub struct Navbar {
    action: NavAction,
}

impl Navbar {
    /// Navbar for the current login state
    pub fn new(logged_in: bool) -> Self {
        Self {
            action: NavAction::for_state(logged_in),
        }
    }
}

impl Widget for Navbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 10 {
            return;
        }

        buf.set_string(
            area.x + 1,
            area.y,
            "Nava AI",
            Style::default().fg(NAVA_INK).add_modifier(Modifier::BOLD),
        );

        let button = format!("[F2] {}", self.action.label());
        let x = area.x + area.width.saturating_sub(button.width() as u16 + 1);
        buf.set_string(x, area.y, &button, Style::default().fg(NAVA_INK));

        if area.height > 1 {
            let rule = "┄".repeat(area.width as usize);
            buf.set_string(area.x, area.y + 1, &rule, Style::default().fg(DIM_GRAY));
            // Red underline under the title
            buf.set_string(area.x + 1, area.y + 1, "───────", Style::default().fg(ACCENT_RED));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_action_follows_login_state() {
        assert_eq!(NavAction::for_state(false), NavAction::Login);
        assert_eq!(NavAction::for_state(true), NavAction::Logout);
    }

    #[test]
    fn test_render_shows_action() {
        let area = Rect::new(0, 0, 30, 2);
        let mut buf = Buffer::empty(area);
        Navbar::new(true).render(area, &mut buf);

        let top = row(&buf, 0);
        assert!(top.contains("Nava AI"));
        assert!(top.contains("[F2] Logout"));
    }
}
