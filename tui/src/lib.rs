//! Nava TUI - Terminal interface for Nava
//!
//! A full-screen terminal chat client. All business logic lives in
//! `nava-core`; this crate renders what the Conductor tells it to.
//!
//! # Architecture
//!
//! - **ConductorClient**: Wraps communication with the embedded Conductor
//! - **Display**: Display state derived from ConductorMessages
//! - **MessageList**: Typewriter reveal and copy flags for the conversation
//! - **Markdown**: Styled lines for assistant replies
//! - **Compositor**: Layered rendering with z-ordering for the login modal
//! - **Widgets**: Navbar and login form
//!
//! ## Event Flow
//!
//! ```text
//! Terminal Events -> SurfaceEvent -> Conductor -> ConductorMessage -> Display State -> Render
//! ```

pub mod app;
pub mod clipboard;
pub mod compositor;
pub mod conductor_client;
pub mod display;
pub mod markdown;
pub mod message_list;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use conductor_client::ConductorClient;
pub use display::{DisplayMessage, DisplayNotification, DisplayState};
pub use message_list::{MessageListState, RevealTiming};
