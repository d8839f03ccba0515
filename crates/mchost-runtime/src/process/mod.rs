//! Lifecycle management for the supervised server process.
//!
//! # Structure
//!
//! - `supervisor` - `ServerSupervisor`, the state machine and public operations
//! - `command` - builds the `java ... -jar <jar> nogui` invocation
//! - `handle` - kill channel between control calls and the exit monitor
//! - `stream` - stdout/stderr ingestion into the log buffer
//! - `shutdown` - stop-then-kill orchestration for host shutdown
//! - `restart` - tokio-backed auto-restart scheduler

mod command;
mod handle;
mod restart;
mod shutdown;
mod stream;
mod supervisor;

pub use restart::TokioRestartScheduler;
pub use stream::LogSource;
pub use supervisor::{STOPPED_LOG_LINE, ServerSupervisor};
