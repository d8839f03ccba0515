//! Process supervision and live log streaming for mchost.
//!
//! - [`ServerSupervisor`] owns the lifecycle state machine of the single
//!   supervised server process, its stdin, and the shared log buffer.
//! - [`open_log_stream`] turns a supervisor into a per-observer stream of
//!   [`LogStreamEvent`]s (connected, status, log batches, heartbeats).
#![deny(unsafe_code)]

pub mod log_stream;
pub mod process;

pub use log_stream::{LogStreamConfig, LogStreamEvent, LogStreamSession, open_log_stream};
pub use process::{LogSource, STOPPED_LOG_LINE, ServerSupervisor, TokioRestartScheduler};

// Re-export the core types callers need alongside the supervisor
pub use mchost_core::{
    ExitCause, ExitReport, LaunchConfig, LogCursor, RestartFuture, RestartScheduler, ServerStatus,
    SupervisorError,
};
