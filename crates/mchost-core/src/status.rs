//! Server lifecycle status and exit bookkeeping.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of the supervised process.
///
/// Transitions:
///
/// ```text
/// Stopped --start--> Starting --spawned--> Running
/// Starting --spawn failed--> Stopped
/// Running --stop / force_stop--> Stopping --exit observed--> Stopped
/// Running --exit observed--> Stopped
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl ServerStatus {
    /// Human-readable label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
        }
    }

    /// True while a child process may be alive.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the last process exited.
///
/// `Stop` and `ForceStop` both surface as [`ServerStatus::Stopping`]; the
/// cause is what tells them apart after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitCause {
    /// Exited after a graceful stop command.
    Requested,
    /// Exited after a force-stop kill.
    Killed,
    /// Exited on its own while running (crash, in-game `stop`, ...).
    Unexpected,
}

/// Outcome of the most recent process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitReport {
    pub cause: ExitCause,
    /// Exit code, when the platform reports one (absent for signal deaths).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    pub exited_at: DateTime<Utc>,
}

impl ExitReport {
    /// Create a report stamped with the current time.
    pub fn new(cause: ExitCause, code: Option<i32>) -> Self {
        Self {
            cause,
            code,
            exited_at: Utc::now(),
        }
    }
}
