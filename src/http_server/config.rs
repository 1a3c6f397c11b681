//! HTTP Server Configuration
//!
//! Listener addresses and CORS settings. The replica listener serves the same
//! routes over the same catalog as the primary.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Primary listener port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Replica listener port, `null` to disable (default: 8081)
    #[serde(default = "default_replica_port")]
    pub replica_port: Option<u16>,

    /// CORS allowed origins; empty allows any origin (default: [])
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_replica_port() -> Option<u16> {
    Some(8081)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            replica_port: default_replica_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified primary port and no replica
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            replica_port: None,
            ..Default::default()
        }
    }

    /// Primary socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Replica socket address string, if a replica is configured
    pub fn replica_socket_addr(&self) -> Option<String> {
        self.replica_port.map(|port| format!("{}:{}", self.host, port))
    }
}
