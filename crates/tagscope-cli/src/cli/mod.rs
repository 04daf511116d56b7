//! CLI for the tagscope analytics request inspector.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use tagscope_core::config;

use commands::{run_decode, run_har, run_providers, run_stream};

/// Top-level CLI for the tagscope analytics request inspector.
#[derive(Debug, Parser)]
#[command(name = "tagscope")]
#[command(about = "tagscope: decode analytics/tracking requests into readable events", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Decode a single request URL and print the normalized event.
    Decode {
        /// Request URL to decode.
        url: String,

        /// Treat the request as issued during a page load (default: click).
        #[arg(long)]
        loading: bool,

        /// Print the event as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Decode every matching entry of a HAR capture file.
    Har {
        /// Path to the HAR file.
        path: String,

        /// Print events as JSON lines instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Read JSONL request records from stdin and emit decoded events.
    Stream {
        /// Only emit events for these session ids (default: every session
        /// seen is treated as interested).
        #[arg(long = "session", value_name = "ID")]
        sessions: Vec<i64>,

        /// Print events as JSON lines instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List known providers and whether config enables them.
    Providers,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Decode { url, loading, json } => run_decode(&cfg, &url, loading, json)?,
            CliCommand::Har { path, json } => run_har(&cfg, Path::new(&path), json)?,
            CliCommand::Stream { sessions, json } => run_stream(&cfg, &sessions, json)?,
            CliCommand::Providers => run_providers(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
