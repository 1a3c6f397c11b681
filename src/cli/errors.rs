//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed and the process exits non-zero.

use std::io;

use thiserror::Error;

use crate::delivery::DeliveryConfigError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, sockets)
    IoError,
    /// Server failed to start or crashed
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "STOCKPULSE_CLI_CONFIG_ERROR",
            Self::IoError => "STOCKPULSE_CLI_IO_ERROR",
            Self::BootFailed => "STOCKPULSE_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {message}", .code.code())]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DeliveryConfigError> for CliError {
    fn from(e: DeliveryConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad port");
        assert_eq!(err.to_string(), "STOCKPULSE_CLI_CONFIG_ERROR: bad port");
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_delivery_error_is_config_error() {
        let err: CliError = DeliveryConfigError::Zero("max_wait_ms").into();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert!(err.message().contains("max_wait_ms"));
    }
}
