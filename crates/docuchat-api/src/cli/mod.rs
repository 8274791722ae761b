//! CLI command definitions for the `docuchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod credential;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chat with a document using Google Gemini.
#[derive(Parser)]
#[command(name = "docuchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file to use instead of `~/.docuchat/config.toml`.
    #[arg(long, global = true, env = "DOCUCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation, optionally loading a document.
    Chat {
        /// Document to load before the first prompt.
        file: Option<PathBuf>,
    },

    /// Ask a single question about a document and print the answer.
    Ask {
        /// Document to ask about.
        file: PathBuf,

        /// The question.
        prompt: String,

        /// Print the conversation as JSON messages instead of rendered text.
        #[arg(long)]
        json: bool,
    },
}
