//! Core domain types and port definitions for mchost.
//!
//! This crate holds everything the supervisor and its adapters share without
//! pulling in process or transport code:
//!
//! - [`LaunchConfig`] - immutable launch parameters for the game server
//! - [`ServerStatus`] / [`ExitReport`] - lifecycle state and exit bookkeeping
//! - [`LogBuffer`] / [`SharedLogBuffer`] - bounded log storage with cursors
//! - [`SupervisorError`] / [`ConfigError`] - errors returned to callers
//! - [`RestartScheduler`] - port for delayed auto-restart attempts
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod logs;
pub mod ports;
pub mod status;

pub use config::{
    DEFAULT_AUTO_RESTART_DELAY, DEFAULT_JAR_PATH, DEFAULT_MAX_LOG_LINES, DEFAULT_MEMORY_MB,
    DEFAULT_STOP_COMMAND, LaunchConfig,
};
pub use error::{ConfigError, SupervisorError};
pub use logs::{LogBuffer, LogCursor, LogSlice, SharedLogBuffer};
pub use ports::{RestartFuture, RestartScheduler};
pub use status::{ExitCause, ExitReport, ServerStatus};

// Only exercised by serialization tests
#[cfg(test)]
use serde_json as _;
