//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ChatGPT Export - download your entire conversation history as one JSON archive.
#[derive(Parser, Debug)]
#[command(name = "chatgpt-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a config file (defaults to the standard location).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full export. Press Ctrl-C to cancel; a cancelled export leaves
    /// no file behind.
    Export {
        /// Directory the archive is written to (defaults to the download
        /// directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bearer token for the backend API. Falls back to the
        /// CHATGPT_ACCESS_TOKEN environment variable, then the token file.
        #[arg(long)]
        token: Option<String>,

        /// Override the backend API base URL.
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show the configuration, token, and output paths being used.
    Paths,
}
