//! Error types returned by the supervisor and configuration checks.

use thiserror::Error;

use crate::status::ServerStatus;

/// Errors returned synchronously by supervisor operations.
///
/// Background tasks (log ingestion, exit monitoring, auto-restart) never
/// return these; they record failures in the log buffer instead.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The operation is not allowed from the current status.
    #[error("Cannot {operation} server: current state is {status}")]
    InvalidState {
        operation: &'static str,
        status: ServerStatus,
    },

    /// There is no live process to act on.
    #[error("Server is not running")]
    NotRunning,

    /// The process is tracked but its stdin is gone (launch/teardown race).
    #[error("Server stdin is not available")]
    StreamUnavailable,

    /// Creating the child process failed.
    #[error("Failed to start process: {0}")]
    SpawnFailed(String),

    /// Delivering the kill signal failed.
    #[error("Failed to kill process: {0}")]
    KillFailed(String),

    /// Writing a command to stdin failed.
    #[error("Failed to send command: {0}")]
    WriteFailed(String),
}

impl SupervisorError {
    pub const fn invalid_state(operation: &'static str, status: ServerStatus) -> Self {
        Self::InvalidState { operation, status }
    }
}

/// Invalid launch parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Java path must be non-empty")]
    EmptyJavaPath,

    #[error("The server's executable path must be non-empty")]
    EmptyJarPath,

    #[error("Memory utilization must be positive")]
    InvalidMemory,

    #[error("Maximum log lines must be positive")]
    InvalidMaxLogLines,

    #[error("Stop command must be non-empty")]
    EmptyStopCommand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message_names_status() {
        let err = SupervisorError::invalid_state("stop", ServerStatus::Stopped);
        assert_eq!(
            err.to_string(),
            "Cannot stop server: current state is Stopped"
        );
    }

    #[test]
    fn test_not_running_message() {
        assert_eq!(
            SupervisorError::NotRunning.to_string(),
            "Server is not running"
        );
    }
}
