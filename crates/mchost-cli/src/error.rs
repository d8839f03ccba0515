//! CLI-specific error types and exit codes.

use mchost_core::ConfigError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error (bad values, missing java or jar).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (bind failure, unreadable paths, ...).
    #[error("IO error: {0}")]
    Io(String),

    /// The game server could not be brought down cleanly.
    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78, // EX_CONFIG
            Self::Io(_) => 74,     // EX_IOERR
            Self::Server(_) => 70, // EX_SOFTWARE
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
