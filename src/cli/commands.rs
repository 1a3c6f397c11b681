//! CLI command implementations

use std::io::{self, Write};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::http_server::{CatalogState, HttpServer};

use super::args::{Command, ServeArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};

const DEFAULT_LOG_FILTER: &str = "stockpulse=info,tower_http=info";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { overrides } => serve(&overrides),
        Command::PrintConfig { overrides } => print_config(&overrides),
    }
}

/// Start the primary and replica listeners over one in-memory catalog.
///
/// Runs until Ctrl-C, then drains in-flight requests and returns.
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    let config = Config::resolve(args)?;
    init_logging();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let state = Arc::new(CatalogState::new(config.delivery.clone()));
        let server = HttpServer::with_state(config.server.clone(), state);

        let shutdown = CancellationToken::new();
        tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

        info!(
            poll_interval_ms = config.delivery.poll_interval_ms,
            max_wait_ms = config.delivery.max_wait_ms,
            emit_interval_ms = config.delivery.emit_interval_ms,
            "starting stockpulse"
        );

        server
            .start(shutdown)
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the effective configuration as pretty JSON
pub fn print_config(args: &ServeArgs) -> CliResult<()> {
    let config = Config::resolve(args)?;
    write_json(&serde_json::to_string_pretty(&config)?)
}

fn write_json(json_str: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` takes precedence over the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => warn!(error = %e, "failed to listen for ctrl-c, shutting down"),
    }
    shutdown.cancel();
}
