//! Login Form Widget
//!
//! The text buffers for the login form and the centered modal that draws
//! them. Validation and submission live in the core; this only edits text.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use crate::display::DisplayModal;
use crate::theme::{ACCENT_RED, DIM_GRAY, ERROR_RED, MODAL_BG, NAVA_INK};

/// Modal size
pub const MODAL_WIDTH: u16 = 44;
/// Modal height
pub const MODAL_HEIGHT: u16 = 11;

/// Which input has focus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    /// Email input
    #[default]
    Email,
    /// Password input
    Password,
}

/// Login form input buffers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email text
    pub email: String,
    /// Password text
    pub password: String,
    /// Focused input
    pub focus: FormField,
}

impl LoginForm {
    /// Type a character into the focused input
    pub fn insert(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    /// Delete the last character of the focused input
    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Move focus to the other input
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Email => FormField::Password,
            FormField::Password => FormField::Email,
        };
    }

    /// Discard everything typed
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Password as bullets
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.chars().count())
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
        }
    }
}

/// Area of the modal centered in `screen`
pub fn modal_area(screen: Rect) -> Rect {
    let width = MODAL_WIDTH.min(screen.width);
    let height = MODAL_HEIGHT.min(screen.height);
    Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    )
}

/// The login modal
pub struct AuthModalView<'a> {
    form: &'a LoginForm,
    state: &'a DisplayModal,
}

impl<'a> AuthModalView<'a> {
    /// View over the form buffers and the Conductor-reported state
    pub fn new(form: &'a LoginForm, state: &'a DisplayModal) -> Self {
        Self { form, state }
    }
}

impl Widget for AuthModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(MODAL_BG));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(DIM_GRAY))
            .title(" Login ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 12 || inner.height < 7 {
            return;
        }

        let x = inner.x + 1;
        let field_width = inner.width.saturating_sub(2) as usize;

        let field = |focused: bool| {
            if focused {
                Style::default().fg(NAVA_INK).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(NAVA_INK)
            }
        };
        let label = |focused: bool| {
            Style::default().fg(if focused { ACCENT_RED } else { DIM_GRAY })
        };

        let email_focus = self.form.focus == FormField::Email;
        buf.set_string(x, inner.y, "Email", label(email_focus));
        buf.set_string(
            x,
            inner.y + 1,
            tail(&self.form.email, field_width),
            field(email_focus),
        );

        let password_focus = self.form.focus == FormField::Password;
        let masked = self.form.masked_password();
        buf.set_string(x, inner.y + 3, "Password", label(password_focus));
        buf.set_string(x, inner.y + 4, tail(&masked, field_width), field(password_focus));

        if self.state.loading {
            buf.set_string(x, inner.y + 6, "Logging in...", Style::default().fg(DIM_GRAY));
        } else if let Some(ref error) = self.state.error {
            buf.set_string(x, inner.y + 6, tail(error, field_width), Style::default().fg(ERROR_RED));
        }

        if inner.height > 7 {
            buf.set_string(
                x,
                inner.y + inner.height - 1,
                "Tab switch · Enter submit · Esc cancel",
                Style::default().fg(DIM_GRAY),
            );
        }
    }
}

/// Last `width` characters, so the cursor end stays visible
fn tail(text: &str, width: usize) -> &str {
    let count = text.chars().count();
    if count <= width {
        return text;
    }
    let skip = count - width;
    let start = text.char_indices().nth(skip).map_or(text.len(), |(i, _)| i);
    &text[start..]
}
