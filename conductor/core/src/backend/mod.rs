//! API Backend Integration
//!
//! Access to the auth and completion services through a common trait
//! interface.
//!
//! # Available Backends
//!
//! - **HTTP**: the Nava API over reqwest (default)
//!
//! # Usage
//!
//! ```ignore
//! use nava_core::backend::{CompletionBackend, HttpBackend};
//! use nava_core::{ChatMessage, NavaConfig};
//!
//! let backend = HttpBackend::from_config(&NavaConfig::default())?;
//! let reply = backend.complete(&[ChatMessage::user("hello")], "").await?;
//! ```

mod http;
mod traits;

pub use http::HttpBackend;
pub use traits::{
    ApiBackend, AuthBackend, CompletionBackend, CompletionRequest, CompletionResponse,
    IdentityResponse, LoginRequest, LoginResponse,
};
