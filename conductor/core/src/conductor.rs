//! Conductor - The Orchestration Core
//!
//! The Conductor is the "brain" of Nava. It owns:
//! - The conversation and the in-flight flag
//! - The login session (token + identity)
//! - The login form state machine
//! - The intro tagline sequence
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. It communicates through:
//! - `ConductorMessage`: Commands sent TO the UI surface
//! - `SurfaceEvent`: Events received FROM the UI surface
//!
//! Network calls run as spawned tasks and report back through an internal
//! channel. The surface drains that channel each frame with [`Conductor::poll`],
//! so every state change happens on the surface's loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::auth_modal::{AuthModal, SubmitRejection};
use crate::backend::{ApiBackend, LoginRequest, LoginResponse};
use crate::config::NavaConfig;
use crate::error::{ApiError, GENERIC_FAILURE};
use crate::events::SurfaceEvent;
use crate::messages::{
    ChatMessage, ConductorMessage, ConductorState, NotifyLevel, UserIdentity,
};
use crate::session::Session;
use crate::tagline::TaglineRotator;
use crate::token_store::TokenStore;

/// Shown when the user submits while a reply is pending
pub const BUSY_NOTICE: &str = "Nava is still thinking. Wait for the reply before sending again.";

/// Result of a spawned network call
enum Outcome {
    Completion(Result<String, ApiError>),
    Login {
        seq: u64,
        result: Result<LoginResponse, ApiError>,
    },
    Identity {
        token: String,
        result: Result<UserIdentity, ApiError>,
    },
}

/// What happened to a submitted message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Appended and a completion request is in flight
    Sent,
    /// Empty or whitespace-only input; nothing happened
    Empty,
    /// A reply is still pending; the input was not consumed
    Busy,
}

/// The Conductor - headless orchestration core
pub struct Conductor<B: ApiBackend, S: TokenStore> {
    /// Configuration
    config: NavaConfig,
    /// Auth + completion services
    backend: Arc<B>,
    /// Token and identity
    session: Session<S>,
    /// Conversation, append-only until cleared
    conversation: Vec<ChatMessage>,
    /// Login form state
    modal: AuthModal,
    /// Sequence number of the newest login request
    login_seq: u64,
    /// Intro taglines
    tagline: TaglineRotator,
    /// Current operational state
    state: ConductorState,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
    /// Results of spawned calls
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl<B: ApiBackend + 'static, S: TokenStore> Conductor<B, S> {
    /// Create a new Conductor
    pub fn new(
        backend: B,
        store: S,
        config: NavaConfig,
        tx: mpsc::Sender<ConductorMessage>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let tagline = TaglineRotator::new(config.tagline_interval());

        Self {
            config,
            backend: Arc::new(backend),
            session: Session::new(store),
            conversation: Vec::new(),
            modal: AuthModal::new(),
            login_seq: 0,
            tagline,
            state: ConductorState::Initializing,
            tx,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &NavaConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> ConductorState {
        self.state
    }

    /// Conversation so far
    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    /// Whether a completion is in flight
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Resolved identity
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.session.identity()
    }

    /// Identity present or token stored
    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Stored token
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// Login form state
    pub fn auth_modal(&self) -> &AuthModal {
        &self.modal
    }

    /// Start the Conductor: restore the session and announce readiness
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.set_state(ConductorState::Initializing).await;
        tracing::info!(backend = self.backend.name(), "Conductor starting");

        if let Some(token) = self.session.bootstrap() {
            tracing::debug!("Stored token found, resolving identity");
            self.spawn_identity(token);
        }

        self.send_session_info().await;
        self.set_state(ConductorState::Ready).await;
        Ok(())
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::trace!(event = ?event, "Surface event");

        match event {
            SurfaceEvent::Connected => {
                self.send(ConductorMessage::State { state: self.state })
                    .await;
                self.send_session_info().await;
            }

            SurfaceEvent::UserMessage { content } => {
                self.send_message(&content).await;
            }

            SurfaceEvent::ClearConversation => self.clear().await,

            SurfaceEvent::LoginRequested => self.open_login().await,

            SurfaceEvent::LogoutRequested => self.logout().await,

            SurfaceEvent::LoginSubmitted { email, password } => {
                self.submit_login(&email, &password).await;
            }

            SurfaceEvent::LoginCancelled => self.cancel_login().await,

            SurfaceEvent::QuitRequested => {
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    /// Submit a user message
    ///
    /// Appends it, then asks the completion service for a reply using the
    /// whole conversation and the stored token (empty when logged out).
    pub async fn send_message(&mut self, content: &str) -> SendOutcome {
        if content.trim().is_empty() {
            return SendOutcome::Empty;
        }
        if self.is_loading() {
            tracing::debug!("Send ignored, completion already in flight");
            self.notify(NotifyLevel::Warning, BUSY_NOTICE).await;
            return SendOutcome::Busy;
        }

        self.append(ChatMessage::user(content)).await;
        self.send(ConductorMessage::ClearInput).await;
        self.set_state(ConductorState::Thinking).await;

        let history = self.conversation.clone();
        let token = self.session.token().unwrap_or_default();
        let backend = Arc::clone(&self.backend);
        let outcome_tx = self.outcome_tx.clone();
        tracing::debug!(messages = history.len(), "Requesting completion");

        tokio::spawn(async move {
            let result = backend.complete(&history, &token).await;
            let _ = outcome_tx.send(Outcome::Completion(result));
        });

        SendOutcome::Sent
    }

    /// Empty the conversation
    ///
    /// A pending reply is not cancelled; it is appended when it arrives.
    pub async fn clear(&mut self) {
        self.conversation.clear();
        self.send(ConductorMessage::ConversationCleared).await;
        self.send(ConductorMessage::ScrollToBottom).await;
    }

    /// Show the login form (only when no identity is resolved)
    pub async fn open_login(&mut self) {
        if self.session.identity().is_some() {
            tracing::debug!("Login form suppressed, already logged in");
            return;
        }
        self.modal.open();
        self.send(ConductorMessage::AuthModalOpened).await;
    }

    /// Forget the token and identity
    pub async fn logout(&mut self) {
        self.session.logout();
        tracing::info!("Logged out");
        self.send_session_info().await;
    }

    /// Validate and submit the login form
    pub async fn submit_login(&mut self, email: &str, password: &str) {
        match self.modal.begin_submit(email, password) {
            Ok(request) => {
                self.send_modal_update().await;
                self.spawn_login(request);
            }
            Err(SubmitRejection::MissingFields) => {
                self.send_modal_update().await;
            }
            Err(rejection) => {
                tracing::debug!(?rejection, "Login submit ignored");
            }
        }
    }

    /// Close the login form without side effects
    pub async fn cancel_login(&mut self) {
        if !self.modal.is_open() {
            return;
        }
        self.modal.cancel();
        self.send(ConductorMessage::AuthModalClosed).await;
    }

    /// Apply every finished network call
    ///
    /// Call this regularly (once per frame). Returns true if anything changed.
    pub async fn poll(&mut self) -> bool {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            outcomes.push(outcome);
        }

        if outcomes.is_empty() {
            return false;
        }

        for outcome in outcomes {
            self.apply_outcome(outcome).await;
        }
        true
    }

    /// Wait for the next network call to finish and apply it
    pub async fn settle_next(&mut self) {
        if let Some(outcome) = self.outcome_rx.recv().await {
            self.apply_outcome(outcome).await;
        }
    }

    /// Advance frame-driven timers
    pub async fn tick(&mut self, delta: Duration) {
        if let Some(text) = self.tagline.update(delta) {
            self.send(ConductorMessage::Tagline {
                text: text.to_string(),
            })
            .await;
        }
    }

    /// Shut down the Conductor
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.set_state(ConductorState::ShuttingDown).await;
        self.send(ConductorMessage::Quit).await;
        Ok(())
    }

    async fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Completion(result) => {
                let reply = match result {
                    Ok(content) => ChatMessage::assistant(content),
                    Err(e) => {
                        tracing::warn!(error = %e, "Completion failed");
                        ChatMessage::assistant_error(&e)
                    }
                };
                self.append(reply).await;
                self.set_state(ConductorState::Ready).await;
            }

            Outcome::Login { seq, result } => self.finish_login(seq, result).await,

            Outcome::Identity { token, result } => {
                if self.session.apply_identity(&token, result) {
                    self.send_session_info().await;
                }
            }
        }
    }

    async fn finish_login(&mut self, seq: u64, result: Result<LoginResponse, ApiError>) {
        let newest = seq == self.login_seq;

        // Err(None) is a failure with no server reason to show
        let outcome: Result<(), Option<ApiError>> = match result {
            Ok(response) => match response.access_token.filter(|t| !t.is_empty()) {
                Some(token) => self.adopt_token(token, response.user),
                None => {
                    tracing::warn!("Login response carried no access token");
                    Err(None)
                }
            },
            Err(e) => {
                tracing::info!(error = %e, "Login failed");
                Err(Some(e))
            }
        };

        match outcome {
            Ok(()) => {
                tracing::info!("Logged in");
                self.send_session_info().await;
                if self.modal.is_open() {
                    self.modal.succeed();
                    self.send(ConductorMessage::AuthModalClosed).await;
                }
            }
            Err(error) => {
                // Only the newest request drives an open form
                if newest && self.modal.is_open() && self.modal.is_loading() {
                    match error {
                        Some(e) => self.modal.fail(&e),
                        None => self.modal.fail_with(GENERIC_FAILURE),
                    }
                    self.send_modal_update().await;
                }
            }
        }
    }

    /// Store an issued token; without a reported user, look the identity up
    fn adopt_token(
        &mut self,
        token: String,
        user: Option<UserIdentity>,
    ) -> Result<(), Option<ApiError>> {
        let lookup = user.is_none();
        if let Err(e) = self.session.login_succeeded(&token, user) {
            tracing::error!(error = %e, "Failed to persist token");
            return Err(None);
        }
        if lookup {
            tracing::debug!("Login response carried no user, looking it up");
            self.spawn_identity(token);
        }
        Ok(())
    }

    fn spawn_login(&mut self, request: LoginRequest) {
        self.login_seq += 1;
        let seq = self.login_seq;
        let backend = Arc::clone(&self.backend);
        let outcome_tx = self.outcome_tx.clone();
        tracing::debug!(email = %request.email, "Submitting login");

        tokio::spawn(async move {
            let result = backend.login(&request).await;
            let _ = outcome_tx.send(Outcome::Login { seq, result });
        });
    }

    fn spawn_identity(&self, token: String) {
        let backend = Arc::clone(&self.backend);
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = backend.fetch_identity(&token).await;
            let _ = outcome_tx.send(Outcome::Identity { token, result });
        });
    }

    /// Append to the conversation and tell the surface
    async fn append(&mut self, message: ChatMessage) {
        let index = self.conversation.len();
        let role = message.role;
        let content = message.content.clone();
        self.conversation.push(message);

        self.send(ConductorMessage::Message {
            index,
            role,
            content,
        })
        .await;
        self.send(ConductorMessage::ScrollToBottom).await;
    }

    async fn send_session_info(&self) {
        self.send(ConductorMessage::SessionInfo {
            identity: self.session.identity().cloned(),
            logged_in: self.session.is_logged_in(),
        })
        .await;
    }

    async fn send_modal_update(&self) {
        self.send(ConductorMessage::AuthModalUpdated {
            loading: self.modal.is_loading(),
            error: self.modal.error().map(str::to_string),
        })
        .await;
    }

    /// Set state and notify UI
    async fn set_state(&mut self, state: ConductorState) {
        self.state = state;
        self.send(ConductorMessage::State { state }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConductorMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::debug!("Failed to send message to surface: {}", e);
        }
    }
}
