//! ChatGPT Export - download your conversation history as one JSON archive.
//!
//! Drives the `chatgpt.com` backend API: lists every conversation, fetches
//! each one's full message graph, reconstructs the visible transcript, and
//! streams the results into a single archive file. Conversations that fail
//! to fetch are skipped and recorded in the archive's `errors` field rather
//! than aborting the run.

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{CancelFlag, ExportOptions, ExportOrchestrator, ProgressObserver};
use cli::{Cli, Commands};
use domain::{AppConfig, ExportOutcome};
use infrastructure::{
    load_config, load_config_from_file, BackendApi, DirectoryDelivery, SessionTokenProvider,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => load_config_from_file(path)?,
        None => load_config()?,
    };

    match cli.command {
        Commands::Export {
            output,
            token,
            base_url,
        } => cmd_export(&config, output, token, base_url).await,
        Commands::Paths => cmd_paths(&config),
    }
}

/// Run a full export.
async fn cmd_export(
    config: &AppConfig,
    output: Option<PathBuf>,
    token: Option<String>,
    base_url: Option<String>,
) -> domain::Result<()> {
    let base_url = base_url.unwrap_or_else(|| config.api.base_url.clone());
    let api = BackendApi::new(base_url)?;

    let cancel = CancelFlag::new();
    let orchestrator = ExportOrchestrator::new(api, ExportOptions::from_config(config), cancel.clone());

    // Ctrl-C requests cooperative cancellation; the in-flight request is
    // allowed to finish before the orchestrator observes the flag.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nCancelling after the current conversation…");
                cancel.request();
            }
        });
    }

    let credentials = SessionTokenProvider::new(token, config);
    let delivery = DirectoryDelivery::new(output.unwrap_or_else(|| config.output_dir()));
    let observer = ConsoleProgress;

    match orchestrator.start(&credentials, &delivery, &observer).await? {
        ExportOutcome::Completed { skipped: 0 } => {
            println!(
                "{} Export complete. Archive saved to {}",
                "✓".green().bold(),
                delivery.dir().display()
            );
        }
        ExportOutcome::Completed { skipped } => {
            println!(
                "{} Export complete with {skipped} conversation{} skipped (details in the archive's errors field). Archive saved to {}",
                "✓".green().bold(),
                if skipped == 1 { "" } else { "s" },
                delivery.dir().display()
            );
        }
        ExportOutcome::Cancelled => {
            println!("{} Export cancelled. No file was written.", "✗".yellow().bold());
        }
    }

    Ok(())
}

/// Show the paths in use.
fn cmd_paths(config: &AppConfig) -> domain::Result<()> {
    println!("{}", "📂 ChatGPT Export Paths".bold());
    println!();
    println!("  config:  {}", config.config_file_path().display());
    println!("  token:   {}", config.token_file_path().display());
    println!("  temp:    {}", config.temp_archive_path().display());
    println!("  output:  {}", config.output_dir().display());

    Ok(())
}

/// Progress observer that prints one status line per update.
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn progress(&self, percent: u8, text: &str) {
        println!("{} {}", format!("[{percent:>3}%]").cyan(), text);
    }
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
