use std::fs;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use parsescope::app::App;
use parsescope::config::Config;

/// Interactive viewer for a document parsing service
#[derive(Parser, Debug)]
#[command(name = "parsescope")]
#[command(about = "Type text, watch the parse tree, click nodes to see their spans", long_about = None)]
#[command(version)]
struct Args {
    /// File whose contents seed the input buffer
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Parse service base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Request timeout in milliseconds (overrides the config file)
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (logging is off without it)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Logs go to a file because the terminal itself is the UI.
fn init_tracing(log_file: &PathBuf) -> anyhow::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("parsescope=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(),
    };
    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(log_file) = &args.log_file {
        init_tracing(log_file)?;
    }

    let config = load_config(&args)?;

    let initial_text = match &args.file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    tracing::info!(server = %config.server_url, "Viewer starting");

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;
    let mut app = App::new(config, initial_text);
    let result = app.run(&mut terminal);
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}
