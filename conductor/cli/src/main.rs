//! socknet-friend - One-Shot Friend Button Surface
//!
//! Performs a single click on a friend/follow button from the command line,
//! the same way the profile page would, and prints the label the button shows
//! afterwards.
//!
//! # Usage
//!
//! ```bash
//! # Follow an author (settings from ~/.config/socknet/conductor.toml)
//! socknet-friend click --id follow-dave --status follow \
//!     --uuid 2f1b6c3e-8d0b-4a44-a3a3-1c2b9f0e7d55 --username dave
//!
//! # Accept a request from a remote author, overriding the site
//! socknet-friend click --id req-1 --status accept_friend_request \
//!     --uuid ... --islocal false --base-url https://sock.net --endpoint friend_requests
//!
//! # Inspect the effective settings
//! socknet-friend show-config
//!
//! # Verbose logging
//! RUST_LOG=debug socknet-friend click ...
//! ```
//!
//! # Exit Codes
//!
//! - `0`: the action succeeded
//! - `1`: the action failed or the click was ignored

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{debug, info};

use socknet_conductor::{
    default_config_path, load_config_from_path, ButtonAttributes, ButtonController,
    ButtonMessage, ClickOutcome, ConductorSettings, ConfigOverrides,
};

/// Command-line surface for socknet friend/follow buttons
#[derive(Parser, Debug)]
#[command(name = "socknet-friend")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, global = true, env = "SOCKNET_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true, env = "SOCKNET_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Click one button and wait for the outcome
    Click(ClickArgs),

    /// Print the effective settings
    ShowConfig(OverrideArgs),
}

/// Attributes of the clicked button
#[derive(ClapArgs, Debug)]
struct ClickArgs {
    /// Button element id
    #[arg(long)]
    id: String,

    /// Current button status (follow, unfollow, unfriend, accept_friend_request)
    #[arg(long)]
    status: String,

    /// Target author UUID
    #[arg(long)]
    uuid: String,

    /// Whether the target author is hosted on this node
    #[arg(long, default_value = "true")]
    islocal: String,

    /// Target author's username (for logs)
    #[arg(long, default_value = "")]
    username: String,

    #[command(flatten)]
    overrides: OverrideArgs,
}

/// Settings that override the config file and environment
#[derive(ClapArgs, Debug, Default)]
struct OverrideArgs {
    /// Site base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Endpoint page kind or full URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Logged-in author UUID
    #[arg(long, value_name = "UUID")]
    author_id: Option<String>,

    /// Anti-forgery token
    #[arg(long, value_name = "TOKEN")]
    csrf_token: Option<String>,

    /// Cookie header to read the anti-forgery token from
    #[arg(long, value_name = "HEADER")]
    cookie: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

impl OverrideArgs {
    fn to_overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref url) = self.base_url {
            overrides = overrides.with_base_url(url);
        }
        if let Some(ref endpoint) = self.endpoint {
            overrides = overrides.with_endpoint(endpoint);
        }
        if let Some(ref author) = self.author_id {
            overrides = overrides.with_author_id(author);
        }
        if let Some(ref token) = self.csrf_token {
            overrides = overrides.with_csrf_token(token);
        }
        if let Some(ref cookie) = self.cookie {
            overrides = overrides.with_cookie_header(cookie);
        }
        if let Some(ms) = self.timeout_ms {
            overrides = overrides.with_request_timeout_ms(ms);
        }
        overrides
    }
}

impl ClickArgs {
    fn attributes(&self) -> ButtonAttributes {
        ButtonAttributes {
            id: self.id.clone(),
            status: self.status.clone(),
            uuid: self.uuid.clone(),
            islocal: self.islocal.clone(),
            username: self.username.clone(),
        }
    }
}

/// Initialize logging with the specified level
///
/// Logs go to stderr so stdout carries only the resulting label.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "socknet_friend={level},socknet_conductor={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load settings and layer the command-line overrides on top
fn load_settings(config: Option<PathBuf>, overrides: &OverrideArgs) -> Result<ConductorSettings> {
    let path = config.or_else(default_config_path);
    let mut settings = load_config_from_path(path).context("Failed to load configuration")?;
    overrides.to_overrides().apply(&mut settings);
    Ok(settings)
}

async fn run_click(config: Option<PathBuf>, args: ClickArgs) -> Result<ExitCode> {
    let settings = load_settings(config, &args.overrides)?;
    let controller_config = settings
        .controller_config()
        .context("Invalid configuration")?;

    info!(
        endpoint = %controller_config.endpoint_url(),
        source = %settings.source(),
        "Using endpoint"
    );

    let (tx, mut rx) = mpsc::channel::<ButtonMessage>(16);
    let controller = ButtonController::with_http(controller_config, settings.token_source(), tx)
        .context("Failed to create HTTP client")?;

    let watcher = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            debug!(button_id = %msg.button_id(), message = ?msg, "Surface message");
        }
    });

    let code = match controller.handle_click(&args.attributes()).await {
        ClickOutcome::Dispatched(pending) => match pending.outcome().await {
            Ok(success) => {
                println!("{}", success.status.label());
                ExitCode::SUCCESS
            }
            Err(failure) => {
                eprintln!("{} failed: {}", failure.action, failure.error);
                ExitCode::FAILURE
            }
        },
        ClickOutcome::Ignored(reason) => {
            eprintln!("Click ignored: {reason}");
            ExitCode::FAILURE
        }
    };

    drop(controller);
    if let Err(e) = watcher.await {
        debug!(error = %e, "Surface message watcher ended early");
    }
    Ok(code)
}

fn show_config(config: Option<PathBuf>, overrides: &OverrideArgs) -> Result<ExitCode> {
    let settings = load_settings(config, overrides)?;

    let file = settings
        .config_file_path
        .as_ref()
        .map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
    println!("config file:  {file}");
    println!("source:       {}", settings.source());
    println!(
        "base_url:     {}",
        settings.base_url.as_deref().unwrap_or("(unset)")
    );
    println!("endpoint:     {}", settings.endpoint);
    println!(
        "author_id:    {}",
        settings.author_id.as_deref().unwrap_or("(unset)")
    );
    println!(
        "timeout_ms:   {}",
        settings
            .request_timeout_ms
            .map_or_else(|| "(client default)".to_string(), |ms| ms.to_string())
    );
    let token = match (&settings.csrf_token, &settings.cookie_header) {
        (Some(_), _) => "fixed token".to_string(),
        (None, Some(_)) => format!("cookie {:?}", settings.cookie_name),
        (None, None) => "(none)".to_string(),
    };
    println!("csrf:         {token}");

    match settings.controller_config() {
        Ok(config) => {
            println!("post url:     {}", config.endpoint_url());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("post url:     (invalid: {e})");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Command::Click(click) => run_click(args.config, click).await,
        Command::ShowConfig(overrides) => show_config(args.config, &overrides),
    }
}
