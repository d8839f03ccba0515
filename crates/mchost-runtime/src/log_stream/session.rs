//! Per-observer delivery state.

use mchost_core::{LogCursor, ServerStatus};
use tracing::debug;

use super::events::LogStreamEvent;
use crate::process::ServerSupervisor;

/// Tracks what one observer has already been sent.
///
/// Lines are addressed by [`LogCursor`], so two identical lines appended
/// back to back are both delivered, and delivery continues normally once
/// the buffer is full and evicting.
#[derive(Debug)]
pub struct LogStreamSession {
    supervisor: ServerSupervisor,
    cursor: LogCursor,
    last_status: ServerStatus,
}

impl LogStreamSession {
    /// Open a session and return the events every new observer starts with:
    /// the greeting, the current status and the full current log (if any).
    pub fn connect(supervisor: ServerSupervisor) -> (Self, Vec<LogStreamEvent>) {
        let status = supervisor.status();
        let backlog = supervisor.logs().read_since(LogCursor::START);

        let mut events = vec![LogStreamEvent::connected(), LogStreamEvent::Status(status)];
        events.extend(LogStreamEvent::log_batch(&backlog.lines));

        debug!(
            status = %status,
            backlog = backlog.lines.len(),
            "Log stream session connected"
        );

        let session = Self {
            supervisor,
            cursor: backlog.next,
            last_status: status,
        };
        (session, events)
    }

    /// Collect whatever changed since the previous call.
    ///
    /// Emits `Status` only when it differs from the last one sent, then at
    /// most one batched `Log` event with every new line in buffer order.
    pub fn poll(&mut self) -> Vec<LogStreamEvent> {
        let mut events = Vec::new();

        let status = self.supervisor.status();
        if status != self.last_status {
            self.last_status = status;
            events.push(LogStreamEvent::Status(status));
        }

        let logs = self.supervisor.logs();
        if logs.cursor() != self.cursor {
            let slice = logs.read_since(self.cursor);
            if slice.skipped > 0 {
                debug!(skipped = slice.skipped, "Log stream fell behind, lines evicted");
            }
            self.cursor = slice.next;
            events.extend(LogStreamEvent::log_batch(&slice.lines));
        }

        events
    }

    /// Position of the next line this session will deliver.
    pub const fn cursor(&self) -> LogCursor {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mchost_core::LaunchConfig;

    fn supervisor(max_log_lines: usize) -> ServerSupervisor {
        let config =
            LaunchConfig::new("/nonexistent/java", "server.jar").with_max_log_lines(max_log_lines);
        ServerSupervisor::new(config).unwrap()
    }

    #[test]
    fn connect_on_empty_buffer_sends_greeting_and_status() {
        let (_, events) = LogStreamSession::connect(supervisor(10));
        assert_eq!(
            events,
            vec![
                LogStreamEvent::connected(),
                LogStreamEvent::Status(ServerStatus::Stopped),
            ]
        );
    }

    #[test]
    fn connect_sends_backlog_as_one_batch() {
        let supervisor = supervisor(10);
        supervisor.add_log("a");
        supervisor.add_log("b");

        let (session, events) = LogStreamSession::connect(supervisor);
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], LogStreamEvent::Log("a\nb".to_string()));
        assert_eq!(session.cursor(), LogCursor::new(2));
    }

    #[test]
    fn poll_without_changes_is_empty() {
        let (mut session, _) = LogStreamSession::connect(supervisor(10));
        assert!(session.poll().is_empty());
    }

    #[test]
    fn identical_lines_are_both_delivered() {
        let supervisor = supervisor(10);
        let (mut session, _) = LogStreamSession::connect(supervisor.clone());

        supervisor.add_log("same");
        assert_eq!(session.poll(), vec![LogStreamEvent::Log("same".to_string())]);

        supervisor.add_log("same");
        assert_eq!(session.poll(), vec![LogStreamEvent::Log("same".to_string())]);
    }

    #[test]
    fn delivery_continues_after_eviction() {
        let supervisor = supervisor(2);
        let (mut session, _) = LogStreamSession::connect(supervisor.clone());

        supervisor.add_log("a");
        supervisor.add_log("b");
        assert_eq!(session.poll(), vec![LogStreamEvent::Log("a\nb".to_string())]);

        // Buffer is full now; every new line evicts one
        supervisor.add_log("c");
        assert_eq!(session.poll(), vec![LogStreamEvent::Log("c".to_string())]);

        supervisor.add_log("d");
        supervisor.add_log("e");
        supervisor.add_log("f");
        // "d" was evicted before this poll; only retained lines are sent
        assert_eq!(session.poll(), vec![LogStreamEvent::Log("e\nf".to_string())]);
    }
}
