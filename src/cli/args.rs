//! CLI argument definitions using clap
//!
//! Commands:
//! - stockpulse serve [--config <path>] [--host <h>] [--port <p>] [--replica-port <p>] [--no-replica]
//! - stockpulse print-config [--config <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// stockpulse - product catalog with short-poll, long-poll and streaming delivery
#[derive(Parser, Debug)]
#[command(name = "stockpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        overrides: ServeArgs,
    },

    /// Print the effective configuration as JSON and exit
    PrintConfig {
        #[command(flatten)]
        overrides: ServeArgs,
    },
}

/// Configuration source and command-line overrides
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind both listeners to
    #[arg(long)]
    pub host: Option<String>,

    /// Primary listener port
    #[arg(long)]
    pub port: Option<u16>,

    /// Replica listener port
    #[arg(long, conflicts_with = "no_replica")]
    pub replica_port: Option<u16>,

    /// Do not start the replica listener
    #[arg(long)]
    pub no_replica: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
