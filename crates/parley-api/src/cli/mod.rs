//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are grouped by
//! noun (e.g., `parley session list`, `parley stats seed 2024-01-01`).

pub mod session;
pub mod stats;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use session::SessionCommand;
use stats::StatsCommand;

/// Store chat sessions and track daily save/delete statistics.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host address to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Inspect and delete stored sessions.
    #[command(alias = "sessions")]
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Inspect and seed the daily statistics counters.
    Stats {
        #[command(subcommand)]
        action: StatsCommand,
    },

    /// Show session and counter totals.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
