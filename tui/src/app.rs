//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - ConductorClient for orchestration
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Sends events to the embedded Conductor via ConductorClient
//! 3. Receives ConductorMessages and updates DisplayState
//! 4. Renders based on DisplayState

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use ratatui::Terminal;
use unicode_width::UnicodeWidthStr;

use nava_core::{
    ApiBackend, ConductorMessage, ConductorState, FileTokenStore, HttpBackend, MessageRole,
    NavaConfig, NotifyLevel, TokenStore, ERROR_PREFIX,
};

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::compositor::{Compositor, LayerId};
use crate::conductor_client::ConductorClient;
use crate::display::{DisplayState, THINKING_TEXT};
use crate::markdown;
use crate::theme::{
    ACCENT_RED, DIM_GRAY, ERROR_RED, FADE_GRAY, NAVA_INK, SUCCESS_GREEN, USER_GRAY,
    WARNING_YELLOW,
};
use crate::widgets::{modal_area, AuthModalView, LoginForm, NavAction, Navbar};

/// Input box height (lines) for text wrapping
const INPUT_HEIGHT: u16 = 5;

/// Navbar rows
const NAVBAR_HEIGHT: u16 = 2;

/// Tagline row under the navbar
const HEADER_HEIGHT: u16 = 1;

/// Lines scrolled per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Frame duration (~30 FPS)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Shown after a reply is copied
const COPIED_MARK: &str = " ✅";

/// Main application state
pub struct App<B: ApiBackend = HttpBackend, S: TokenStore = FileTokenStore> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    conductor: ConductorClient<B, S>,
    /// Display state derived from ConductorMessages
    display: DisplayState,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,
    /// Where copied replies go
    clipboard: Box<dyn Clipboard>,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Login form buffers
    form: LoginForm,
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered lines (for scroll bounds)
    total_lines: usize,

    // === Misc State ===
    /// Last frame time (for animations)
    last_frame: Instant,
    /// Terminal size
    size: (u16, u16),
}

/// Layer IDs for UI regions
struct AppLayers {
    navbar: LayerId,
    header: LayerId,
    conversation: LayerId,
    input: LayerId,
    status: LayerId,
    modal: LayerId,
}

/// Screen regions for a terminal size
struct Regions {
    navbar: Rect,
    header: Rect,
    conversation: Rect,
    input: Rect,
    status: Rect,
    modal: Rect,
}

impl Regions {
    fn for_size(width: u16, height: u16) -> Self {
        let top = NAVBAR_HEIGHT + HEADER_HEIGHT;
        let bottom = INPUT_HEIGHT + 1;
        Self {
            navbar: Rect::new(0, 0, width, NAVBAR_HEIGHT.min(height)),
            header: Rect::new(0, NAVBAR_HEIGHT, width, HEADER_HEIGHT),
            conversation: Rect::new(0, top, width, height.saturating_sub(top + bottom)),
            input: Rect::new(0, height.saturating_sub(bottom), width, INPUT_HEIGHT),
            status: Rect::new(0, height.saturating_sub(1), width, 1),
            modal: modal_area(Rect::new(0, 0, width, height)),
        }
    }
}

impl App {
    /// Create the terminal app for the given configuration
    pub fn new(config: NavaConfig) -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;
        let conductor = ConductorClient::new(config)?;
        Ok(Self::with_client(
            conductor,
            Box::new(SystemClipboard::new()),
            size,
        ))
    }
}

impl<B: ApiBackend + 'static, S: TokenStore> App<B, S> {
    /// Create an app around an existing client
    pub fn with_client(
        conductor: ConductorClient<B, S>,
        clipboard: Box<dyn Clipboard>,
        size: (u16, u16),
    ) -> Self {
        let regions = Regions::for_size(size.0, size.1);
        let mut compositor = Compositor::new(Rect::new(0, 0, size.0, size.1));

        // Create layers with z-ordering
        let conversation = compositor.create_layer(regions.conversation, 0);
        let navbar = compositor.create_layer(regions.navbar, 10);
        let header = compositor.create_layer(regions.header, 10);
        let input = compositor.create_layer(regions.input, 10);
        let status = compositor.create_layer(regions.status, 10);

        let modal = compositor.create_layer(regions.modal, 100);
        compositor.set_opaque(modal, true);
        compositor.set_visible(modal, false);

        let display = DisplayState::from_config(conductor.config());

        Self {
            running: true,
            conductor,
            display,
            compositor,
            layers: AppLayers {
                navbar,
                header,
                conversation,
                input,
                status,
                modal,
            },
            clipboard,
            input_buffer: String::new(),
            form: LoginForm::default(),
            scroll_offset: 0,
            total_lines: 0,
            last_frame: Instant::now(),
            size,
        }
    }

    /// Display state (for inspection)
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restore the session and attach to the Conductor
    pub async fn start(&mut self) {
        if let Err(e) = self.conductor.start().await {
            tracing::warn!("Conductor start error: {}", e);
        }
        if let Err(e) = self.conductor.connect().await {
            tracing::warn!("Conductor connect error: {}", e);
        }
        self.process_conductor_messages();
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        self.start().await;

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => self.running = false,
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(FRAME_DURATION) => {}
            }

            self.frame().await;
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    /// One frame of non-render work: finished calls, messages, timers
    pub async fn frame(&mut self) {
        self.conductor.poll().await;
        self.process_conductor_messages();
        self.update().await;
        // Messages produced by tick (taglines)
        self.process_conductor_messages();
    }

    /// Dispatch a terminal event
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            Event::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.conductor.recv_all() {
            match &msg {
                ConductorMessage::ClearInput => self.input_buffer.clear(),
                ConductorMessage::ScrollToBottom => self.scroll_offset = 0,
                ConductorMessage::AuthModalOpened | ConductorMessage::AuthModalClosed => {
                    self.form.clear();
                }
                ConductorMessage::Quit => self.running = false,
                _ => {}
            }

            self.display.apply_message(msg);
        }
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.quit().await;
            return;
        }

        if self.display.modal.open {
            self.handle_modal_key(key).await;
            return;
        }

        match key.code {
            // Quit
            KeyCode::Esc => self.quit().await,

            // Newline
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
            {
                self.input_buffer.push('\n');
            }

            // Submit message; the Conductor clears the input if it accepts it
            KeyCode::Enter => {
                if !self.input_buffer.trim().is_empty() {
                    let message = self.input_buffer.clone();
                    if let Err(e) = self.conductor.send_message(message).await {
                        tracing::warn!("Send failed: {}", e);
                    }
                }
            }

            KeyCode::Char('l') if ctrl => {
                if let Err(e) = self.conductor.clear().await {
                    tracing::warn!("Clear failed: {}", e);
                }
            }

            KeyCode::Char('y') if ctrl => self.copy_selected_reply(),

            // Pick an older reply for Ctrl+Y
            KeyCode::Up if key.modifiers.contains(KeyModifiers::ALT) => {
                self.display.select_previous_reply();
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::ALT) => {
                self.display.select_next_reply();
            }

            KeyCode::F(2) => {
                let result = match NavAction::for_state(self.display.logged_in) {
                    NavAction::Login => self.conductor.login().await,
                    NavAction::Logout => self.conductor.logout().await,
                };
                if let Err(e) = result {
                    tracing::warn!("Navbar action failed: {}", e);
                }
            }

            KeyCode::Tab => self.display.list.skip_reveal(),

            // Typing
            KeyCode::Char(c) if !ctrl => self.input_buffer.push(c),

            KeyCode::Backspace => {
                self.input_buffer.pop();
            }

            // Conversation scrolling
            KeyCode::PageUp => {
                let page = self.page_size();
                self.scroll_up(page);
            }
            KeyCode::PageDown => {
                let page = self.page_size();
                self.scroll_offset = self.scroll_offset.saturating_sub(page);
            }
            KeyCode::Home if ctrl => {
                self.scroll_offset = self.total_lines.saturating_sub(1);
            }
            KeyCode::End if ctrl => {
                self.scroll_offset = 0;
            }

            _ => {}
        }
    }

    /// Keys while the login form is open
    async fn handle_modal_key(&mut self, key: KeyEvent) {
        let result = match key.code {
            KeyCode::Esc => self.conductor.cancel_login().await,
            KeyCode::Enter => {
                self.conductor
                    .submit_login(self.form.email.clone(), self.form.password.clone())
                    .await
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.form.toggle_focus();
                Ok(())
            }
            KeyCode::Backspace => {
                self.form.backspace();
                Ok(())
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.insert(c);
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!("Login form action failed: {}", e);
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(WHEEL_LINES);
            }
            _ => {}
        }
    }

    /// Bracketed paste goes into whichever input has focus
    fn handle_paste(&mut self, text: &str) {
        if self.display.modal.open {
            text.chars()
                .filter(|c| !c.is_control())
                .for_each(|c| self.form.insert(c));
        } else {
            self.input_buffer.push_str(text);
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.compositor.resize(Rect::new(0, 0, width, height));

        let regions = Regions::for_size(width, height);
        for (id, rect) in [
            (self.layers.navbar, regions.navbar),
            (self.layers.header, regions.header),
            (self.layers.conversation, regions.conversation),
            (self.layers.input, regions.input),
            (self.layers.status, regions.status),
            (self.layers.modal, regions.modal),
        ] {
            self.compositor.move_layer(id, rect.x, rect.y);
            self.compositor.resize_layer(id, rect.width, rect.height);
        }
    }

    async fn quit(&mut self) {
        if let Err(e) = self.conductor.request_quit().await {
            tracing::warn!("Quit request failed: {}", e);
        }
        self.running = false;
    }

    /// Copy the selected assistant reply, or the newest one
    fn copy_selected_reply(&mut self) {
        let Some((index, message)) = self.display.copy_target() else {
            return;
        };
        let content = message.content.clone();

        match self
            .display
            .list
            .copy(index, &content, self.clipboard.as_mut())
        {
            Ok(()) => tracing::debug!(index, "Reply copied"),
            Err(e) => {
                tracing::warn!(error = %e, "Copy failed");
                self.display.apply_message(ConductorMessage::Notify {
                    level: NotifyLevel::Error,
                    message: e.to_string(),
                });
            }
        }
    }

    fn page_size(&self) -> usize {
        let chrome = NAVBAR_HEIGHT + HEADER_HEIGHT + INPUT_HEIGHT + 1;
        (self.size.1.saturating_sub(chrome) / 2).max(1) as usize
    }

    fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.total_lines.saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    /// Update timers and state
    async fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.display.update(delta);
        self.conductor.tick(delta).await;

        self.compositor
            .set_visible(self.layers.modal, self.display.modal.open);
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        self.render_layers();

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    let idx = output.index_of(x, y);
                    if idx < output.content.len() {
                        buf[(x, y)] = output.content[idx].clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Draw every layer and composite them
    pub fn compose(&mut self) -> &Buffer {
        self.render_layers();
        self.compositor.composite()
    }

    fn render_layers(&mut self) {
        self.render_navbar();
        self.render_header();
        self.render_conversation();
        self.render_input();
        self.render_status();
        self.render_modal();
    }

    /// Render navbar layer
    fn render_navbar(&mut self) {
        let logged_in = self.display.logged_in;
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.navbar) {
            buf.reset();
            let area = buf.area;
            Navbar::new(logged_in).render(area, buf);
        }
    }

    /// Render the tagline row
    fn render_header(&mut self) {
        let tagline = self.display.tagline.clone();
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.header) {
            buf.reset();
            let Some(text) = tagline else {
                return;
            };
            let area = buf.area;
            let x = area.width.saturating_sub(text.width() as u16) / 2;
            buf.set_string(area.x + x, area.y, &text, Style::default().fg(DIM_GRAY));
        }
    }

    /// Render conversation layer
    fn render_conversation(&mut self) {
        let width = self.size.0.saturating_sub(2) as usize;
        let height = self
            .size
            .1
            .saturating_sub(NAVBAR_HEIGHT + HEADER_HEIGHT + INPUT_HEIGHT + 1)
            as usize;

        if width < 10 || height < 3 {
            return;
        }

        // Build wrapped lines from display messages, tagged with their index
        let mut all_lines: Vec<(Line<'static>, Option<usize>)> = Vec::new();

        for (index, msg) in self.display.messages.iter().enumerate() {
            let shown = self.display.list.display_text(index, &msg.content);

            let style = match msg.role {
                MessageRole::User => Style::default().fg(USER_GRAY),
                MessageRole::Assistant if msg.content.starts_with(ERROR_PREFIX) => {
                    Style::default().fg(ERROR_RED)
                }
                MessageRole::Assistant => Style::default().fg(NAVA_INK),
            };

            let mut lines = if msg.role == MessageRole::Assistant
                && !msg.content.starts_with(ERROR_PREFIX)
            {
                markdown::render(shown, style)
            } else {
                markdown::plain(shown, style)
            };

            if lines.is_empty() {
                lines.push(Line::default());
            }
            lines[0].spans.insert(0, Span::styled(msg.prefix(), style));

            let last = lines.len() - 1;
            if self.display.list.is_revealing_index(index) {
                lines[last].spans.push(Span::styled("▌", style));
            } else if self.display.list.is_copied(index) {
                lines[last]
                    .spans
                    .push(Span::styled(COPIED_MARK, Style::default().fg(SUCCESS_GREEN)));
            }

            for line in &lines {
                for wrapped in markdown::wrap(line, width) {
                    all_lines.push((wrapped, Some(index)));
                }
            }
            all_lines.push((Line::default(), None));
        }

        if self.display.is_loading() {
            all_lines.push((
                Line::from(Span::styled(THINKING_TEXT, Style::default().fg(DIM_GRAY))),
                None,
            ));
        }

        self.total_lines = all_lines.len();

        // Clamp scroll offset
        let max_scroll = self.total_lines.saturating_sub(height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        // Calculate visible range
        let visible_end = self.total_lines.saturating_sub(self.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);

        let has_content_above = visible_start > 0;
        let has_content_below = self.scroll_offset > 0;

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.conversation) {
            buf.reset();
            let area = buf.area;

            let selected = self.display.selected;
            let visible = all_lines.iter().skip(visible_start).take(height);
            for (i, (line, owner)) in visible.enumerate() {
                let y = i as u16;
                if y >= area.height {
                    break;
                }

                if selected.is_some() && *owner == selected {
                    buf.set_string(area.x, y, "▎", Style::default().fg(ACCENT_RED));
                }

                // Fade the edges when there is more to scroll
                let faded = (has_content_above && i == 0)
                    || (has_content_below && i + 1 == height);
                let max_width = area.width.saturating_sub(1);
                if faded {
                    let dim = Style::default().fg(FADE_GRAY);
                    let plain: Vec<Span> = line
                        .spans
                        .iter()
                        .map(|span| Span::styled(span.content.clone(), dim))
                        .collect();
                    buf.set_line(area.x + 1, y, &Line::from(plain), max_width);
                } else {
                    buf.set_line(area.x + 1, y, line, max_width);
                }
            }
        }
    }

    /// Render input layer
    fn render_input(&mut self) {
        let modal_open = self.display.modal.open;
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.input) {
            buf.reset();
            let area = buf.area;

            let separator = "─".repeat(area.width as usize);
            buf.set_string(area.x, area.y, &separator, Style::default().fg(DIM_GRAY));

            let text_height = area.height.saturating_sub(1) as usize;
            let text_width = area.width.saturating_sub(2) as usize;

            if text_width < 5 || text_height < 1 {
                return;
            }

            let cursor = if modal_open { "" } else { "_" };
            let full_input = format!("> {}{}", self.input_buffer, cursor);
            let wrapped: Vec<String> = textwrap::wrap(&full_input, text_width)
                .into_iter()
                .map(|line| line.into_owned())
                .collect();

            let skip = wrapped.len().saturating_sub(text_height);
            for (i, line) in wrapped.iter().skip(skip).enumerate() {
                let y = area.y + 1 + i as u16;
                buf.set_string(area.x + 1, y, line, Style::default().fg(NAVA_INK));
            }

            if skip > 0 {
                buf.set_string(
                    area.x + area.width.saturating_sub(3),
                    area.y,
                    "^",
                    Style::default().fg(WARNING_YELLOW),
                );
            }
        }
    }

    /// Render status bar
    fn render_status(&mut self) {
        let left = match self.display.notification {
            Some(ref n) => (
                format!(" {}", n.message),
                Style::default().fg(match n.level {
                    NotifyLevel::Info => SUCCESS_GREEN,
                    NotifyLevel::Warning => WARNING_YELLOW,
                    NotifyLevel::Error => ERROR_RED,
                }),
            ),
            None => {
                let scroll_info = if self.scroll_offset > 0 {
                    format!(" [^{} lines]", self.scroll_offset)
                } else {
                    String::new()
                };
                let style = match self.display.conductor_state {
                    ConductorState::Thinking => Style::default().fg(ACCENT_RED),
                    _ => Style::default().fg(DIM_GRAY),
                };
                (
                    format!(
                        " {} | Enter send | Ctrl+L clear | Ctrl+Y copy | Esc quit{}",
                        self.display.conductor_state.description(),
                        scroll_info
                    ),
                    style,
                )
            }
        };
        let footer = self.display.footer();

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            buf.reset();
            let area = buf.area;

            buf.set_string(area.x, area.y, &left.0, left.1);

            if let Some(footer) = footer {
                let x = area.width.saturating_sub(footer.width() as u16 + 1);
                if x as usize > left.0.width() {
                    buf.set_string(area.x + x, area.y, &footer, Style::default().fg(Color::Reset));
                }
            }
        }
    }

    /// Render the login modal
    fn render_modal(&mut self) {
        if !self.display.modal.open {
            return;
        }
        let form = &self.form;
        let state = &self.display.modal;
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.modal) {
            buf.reset();
            let area = buf.area;
            AuthModalView::new(form, state).render(area, buf);
        }
    }
}
