//! CLI module for stockpulse
//!
//! Provides command-line interface for:
//! - serve: run the primary and replica HTTP listeners
//! - print-config: show the effective configuration

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{print_config, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
