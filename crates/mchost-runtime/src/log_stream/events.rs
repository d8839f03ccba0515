//! Events delivered to a single log stream observer.

use std::time::Duration;

use mchost_core::ServerStatus;

/// Greeting sent as the first event of every stream.
pub const CONNECTED_MESSAGE: &str = "Connected to log stream";

/// Payload of heartbeat events.
pub const HEARTBEAT_PAYLOAD: &str = "ping";

/// One event on a log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStreamEvent {
    Connected(String),
    Status(ServerStatus),
    /// One or more log lines, newline-joined, in buffer order.
    Log(String),
    Heartbeat,
}

impl LogStreamEvent {
    pub fn connected() -> Self {
        Self::Connected(CONNECTED_MESSAGE.to_string())
    }

    /// Batch `lines` into a single event, or `None` when there are none.
    pub fn log_batch(lines: &[String]) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self::Log(lines.join("\n")))
        }
    }

    /// Event name used by transports (the SSE `event:` field).
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Connected(_) => "connected",
            Self::Status(_) => "status",
            Self::Log(_) => "log",
            Self::Heartbeat => "heartbeat",
        }
    }

    /// Plain-text payload. Status is rendered as its label;
    /// transports that want richer markup match on the variant instead.
    pub fn payload(&self) -> &str {
        match self {
            Self::Connected(message) | Self::Log(message) => message,
            Self::Status(status) => status.as_str(),
            Self::Heartbeat => HEARTBEAT_PAYLOAD,
        }
    }
}

/// Timing of a log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStreamConfig {
    /// How often the buffer and status are checked for changes.
    pub poll_interval: Duration,
    pub heartbeat_interval: Duration,
}

impl LogStreamConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
    pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);
}

impl Default for LogStreamConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}
