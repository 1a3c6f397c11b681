//! Configuration file loading
//!
//! The JSON file is optional; every field has a default. Command-line flags
//! are applied on top of the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::delivery::DeliveryConfig;
use crate::http_server::ServerConfig;

use super::args::ServeArgs;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Build the effective configuration from an optional file and overrides
    pub fn resolve(args: &ServeArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(host) = &args.host {
            config.server.host = host.clone();
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if let Some(port) = args.replica_port {
            config.server.replica_port = Some(port);
        }
        if args.no_replica {
            config.server.replica_port = None;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate timing and listener settings
    pub fn validate(&self) -> CliResult<()> {
        self.delivery.validate()?;

        if self.server.replica_port == Some(self.server.port) && self.server.port != 0 {
            return Err(CliError::config_error(format!(
                "replica_port must differ from port ({})",
                self.server.port
            )));
        }

        Ok(())
    }
}
