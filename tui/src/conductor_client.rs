//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly and provides a convenient
//! interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! All orchestration happens in the Conductor. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Render display state based on messages

use std::time::Duration;

use tokio::sync::mpsc;

use nava_core::{
    ApiBackend, Conductor, ConductorMessage, ConductorState, FileTokenStore, HttpBackend,
    NavaConfig, SurfaceEvent, TokenStore,
};

/// Capacity of the Conductor -> TUI channel
const CHANNEL_CAPACITY: usize = 256;

/// Client for communicating with the embedded Conductor
pub struct ConductorClient<B: ApiBackend = HttpBackend, S: TokenStore = FileTokenStore> {
    /// The embedded Conductor instance
    conductor: Conductor<B, S>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
}

impl ConductorClient {
    /// Create a client talking to the configured API with a file token store
    pub fn new(config: NavaConfig) -> anyhow::Result<Self> {
        let backend = HttpBackend::from_config(&config)?;
        let store = FileTokenStore::new(config.token_path());
        Ok(Self::with_parts(backend, store, config))
    }
}

impl<B: ApiBackend + 'static, S: TokenStore> ConductorClient<B, S> {
    /// Create a client around any backend and token store
    pub fn with_parts(backend: B, store: S, config: NavaConfig) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let conductor = Conductor::new(backend, store, config, tx);
        Self { conductor, rx }
    }

    /// Configuration in use
    pub fn config(&self) -> &NavaConfig {
        self.conductor.config()
    }

    /// Start the Conductor (restore the session)
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.conductor.start().await
    }

    /// Connect this surface to the Conductor
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::Connected).await
    }

    /// Send a user message to the Conductor
    pub async fn send_message(&mut self, content: String) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::UserMessage { content })
            .await
    }

    /// Empty the conversation
    pub async fn clear(&mut self) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::ClearConversation)
            .await
    }

    /// Open the login form
    pub async fn login(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::LoginRequested).await
    }

    /// Forget the session
    pub async fn logout(&mut self) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::LogoutRequested)
            .await
    }

    /// Submit the login form
    pub async fn submit_login(&mut self, email: String, password: String) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::LoginSubmitted { email, password })
            .await
    }

    /// Close the login form
    pub async fn cancel_login(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::LoginCancelled).await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::QuitRequested).await
    }

    /// Apply finished network calls (must be called regularly)
    pub async fn poll(&mut self) -> bool {
        self.conductor.poll().await
    }

    /// Wait for the next network call to finish
    pub async fn settle_next(&mut self) {
        self.conductor.settle_next().await;
    }

    /// Advance Conductor timers
    pub async fn tick(&mut self, delta: Duration) {
        self.conductor.tick(delta).await;
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Conductor state
    pub fn state(&self) -> ConductorState {
        self.conductor.state()
    }
}
