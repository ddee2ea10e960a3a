//! Theme and Colors
//!
//! Nava's palette: ink on paper, with a red accent for the title underline
//! and errors.

use ratatui::style::Color;

// ============================================================================
// Text
// ============================================================================

/// Assistant text
pub const NAVA_INK: Color = Color::Rgb(230, 230, 230);

/// User text - a step dimmer than the assistant
pub const USER_GRAY: Color = Color::Rgb(170, 170, 170);

/// Labels, separators, hints
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Scroll fade near the edges
pub const FADE_GRAY: Color = Color::Rgb(80, 80, 80);

// ============================================================================
// Accents
// ============================================================================

/// Title underline and focus ring
pub const ACCENT_RED: Color = Color::Rgb(220, 60, 60);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning yellow
pub const WARNING_YELLOW: Color = Color::Rgb(230, 200, 90);

/// Success green (copied flag)
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Inline and fenced code
pub const CODE_AMBER: Color = Color::Rgb(230, 170, 90);

/// Modal backdrop
pub const MODAL_BG: Color = Color::Rgb(25, 25, 25);
