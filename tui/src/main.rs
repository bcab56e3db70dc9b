//! socknet TUI Entry Point
//!
//! Usage:
//!   socknet-tui [OPTIONS] <PAGE>
//!
//! `<PAGE>` is a JSON page file (see `page`). Settings come from
//! `~/.config/socknet/conductor.toml` and `SOCKNET_*` environment variables.
//!
//! Logs never go to the terminal; pass `--log-file` to keep them.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use socknet_conductor::{
    default_config_path, load_config_from_path, ButtonAttributes, ButtonController,
    ConfigOverrides,
};
use socknet_tui::page::load_page_file;
use socknet_tui::App;

/// Terminal surface for socknet friend/follow buttons
#[derive(Parser, Debug)]
#[command(name = "socknet-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page file listing the buttons to show
    page: PathBuf,

    /// Configuration file path
    #[arg(short = 'c', long, env = "SOCKNET_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Site base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Logged-in author UUID
    #[arg(long, value_name = "UUID")]
    author_id: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Set up logging without touching the terminal
fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
                .with(filter)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    // Everything that can fail before the screen switches
    let buttons = load_page_file(&args.page)?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref url) = args.base_url {
        overrides = overrides.with_base_url(url);
    }
    if let Some(ref author) = args.author_id {
        overrides = overrides.with_author_id(author);
    }
    let mut settings = load_config_from_path(args.config.clone().or_else(default_config_path))
        .context("Failed to load configuration")?;
    overrides.apply(&mut settings);
    let config = settings
        .controller_config()
        .context("Invalid configuration")?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: socknet-tui requires a terminal (TTY)");
        std::process::exit(1);
    }

    // Room for one render message per button plus click traffic
    let (tx, rx) = mpsc::channel(buttons.len().max(1) * 4 + 64);
    let controller = ButtonController::with_http(config, settings.token_source(), tx)
        .context("Failed to create HTTP client")?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, App::new(controller, rx), buttons).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<A: socknet_conductor::FriendApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<A>,
    buttons: Vec<ButtonAttributes>,
) -> anyhow::Result<()> {
    app.load_page(buttons).await;
    app.run(terminal).await
}
