//! Widgets

pub mod auth_modal;
pub mod navbar;

pub use auth_modal::{modal_area, AuthModalView, FormField, LoginForm};
pub use navbar::{NavAction, Navbar};
