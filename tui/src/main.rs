//! Nava TUI Entry Point
//!
//! Launches the terminal chat client.
//!
//! Usage:
//!   nava
//!
//! Environment:
//!   NAVA_API_URL     API origin (default: http://localhost:8000)
//!   NAVA_CONFIG      Config file (default: <config_dir>/nava/config.toml)
//!   NAVA_LOG_FILE    Log file (default: <cache_dir>/nava/nava.log)
//!   RUST_LOG         Log filter (default: nava_core=info,nava_tui=info)

use std::fs::{self, File, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nava_tui::App;

const DEFAULT_FILTER: &str = "nava_core=info,nava_tui=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("❌ Error: nava requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // The terminal belongs to the UI, so logs go to a file
    if let Err(e) = init_logging() {
        eprintln!("⚠️  Logging disabled: {e:#}");
    }

    let config = nava_core::load_config().context("failed to load configuration")?;
    tracing::info!(api = %config.api_base_url, "Starting Nava");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    // Build the app before touching the terminal so config errors print cleanly
    let mut app = App::new(config)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("Nava exited with error: {e:#}");
    } else {
        println!("\n\x1b[31mNava:\x1b[0m See you soon!\n");
    }

    // Propagate any errors
    result
}

/// Install a file-backed subscriber
fn init_logging() -> anyhow::Result<()> {
    let path = log_path().context("no cache directory for the log file")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}

fn log_path() -> Option<PathBuf> {
    std::env::var_os("NAVA_LOG_FILE")
        .map(PathBuf::from)
        .or_else(|| dirs::cache_dir().map(|dir| dir.join("nava").join("nava.log")))
}
