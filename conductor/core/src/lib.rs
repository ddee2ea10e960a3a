//! Nava Core - Headless Chat Orchestration
//!
//! This crate provides the core logic of the Nava chat client, completely
//! independent of any UI framework. It can drive the terminal UI or run
//! headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        UI Surface                            │
//! │        navbar · message list · input · login form           │
//! │                           │                                  │
//! │                    SurfaceEvent (up)                        │
//! │                  ConductorMessage (down)                    │
//! └───────────────────────────┼──────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────┐
//! │                       NAVA CORE                              │
//! │  ┌────────────────────────┴────────────────────────────────┐ │
//! │  │                      Conductor                           │ │
//! │  │  ┌──────────┐  ┌───────────┐  ┌──────────┐  ┌─────────┐ │ │
//! │  │  │ Session  │  │ AuthModal │  │ Tagline  │  │ Backend │ │ │
//! │  │  │ + Token  │  │           │  │          │  │ (HTTP)  │ │ │
//! │  │  └──────────┘  └───────────┘  └──────────┘  └─────────┘ │ │
//! │  └──────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns the conversation and coordinates everything
//! - [`ConductorMessage`]: Messages sent from Conductor to the UI surface
//! - [`SurfaceEvent`]: Events sent from the UI surface to Conductor
//! - [`Session`]: Stored token and resolved identity
//! - [`TokenStore`]: Injectable token persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use nava_core::{load_config, Conductor, FileTokenStore, HttpBackend, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let (tx, mut rx) = mpsc::channel(256);
//!
//!     let backend = HttpBackend::from_config(&config)?;
//!     let store = FileTokenStore::new(config.token_path());
//!     let mut conductor = Conductor::new(backend, store, config, tx);
//!
//!     conductor.start().await?;
//!     conductor.handle_event(SurfaceEvent::Connected).await?;
//!
//!     loop {
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message to UI
//!         }
//!
//!         // Apply finished network calls
//!         conductor.poll().await;
//!     }
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod auth_modal;
pub mod backend;
pub mod conductor;
pub mod config;
pub mod error;
pub mod events;
pub mod messages;
pub mod session;
pub mod tagline;
pub mod token_store;

// Re-exports for convenience
pub use auth_modal::{AuthModal, SubmitRejection, MISSING_FIELDS};
pub use backend::{
    ApiBackend, AuthBackend, CompletionBackend, HttpBackend, LoginRequest, LoginResponse,
};
pub use conductor::{Conductor, SendOutcome, BUSY_NOTICE};
pub use config::{default_config_path, load_config, load_config_from_path, NavaConfig};
pub use error::{ApiError, ConfigError, TokenStoreError, GENERIC_FAILURE};
pub use events::SurfaceEvent;
pub use messages::{
    ChatMessage, ConductorMessage, ConductorState, MessageRole, NotifyLevel, UserIdentity,
    ERROR_PREFIX,
};
pub use session::Session;
pub use tagline::{TaglineRotator, TAGLINES};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
