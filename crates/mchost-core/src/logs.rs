//! Bounded log storage for the supervised server.
//!
//! [`LogBuffer`] is a plain ring buffer; [`SharedLogBuffer`] wraps it in a
//! reader/writer lock so ingestion tasks, the exit monitor and any number of
//! readers can use it concurrently. Readers only ever receive copies.
//!
//! Two ways of addressing lines are supported:
//! - buffer indices (`since`), which shift when old lines are evicted;
//! - [`LogCursor`]s (`read_since`), which count every line ever appended and
//!   therefore stay valid across eviction. Streaming sessions use cursors.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

/// Monotonic position in the log: the number of lines appended so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogCursor(u64);

impl LogCursor {
    /// Cursor positioned before the first line ever appended.
    pub const START: Self = Self(0);

    pub const fn new(position: u64) -> Self {
        Self(position)
    }

    pub const fn position(self) -> u64 {
        self.0
    }
}

/// Lines read from a cursor, plus the cursor to continue from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSlice {
    pub lines: Vec<String>,
    pub next: LogCursor,
    /// Lines between the requested cursor and the oldest retained line that
    /// were evicted before the reader got to them.
    pub skipped: u64,
}

/// Ring buffer of the most recent log lines.
#[derive(Debug)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
    appended: u64,
}

impl LogBuffer {
    /// Create an empty buffer holding at most `capacity` lines.
    ///
    /// A zero capacity is treated as one so the newest line is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            appended: 0,
        }
    }

    /// Append a line, evicting the oldest one when full.
    pub fn push(&mut self, line: String) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        self.appended += 1;
    }

    /// Copy of every retained line, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    /// Lines after buffer index `index`; empty when `index >= len()`.
    pub fn since(&self, index: usize) -> Vec<String> {
        if index >= self.lines.len() {
            return Vec::new();
        }
        self.lines.range(index..).cloned().collect()
    }

    /// Lines appended at or after `cursor` that are still retained.
    pub fn read_since(&self, cursor: LogCursor) -> LogSlice {
        let oldest = self.appended - self.lines.len() as u64;
        let from = cursor.0.clamp(oldest, self.appended);
        // `from - oldest` is bounded by `lines.len()`, so it fits in usize.
        let offset = usize::try_from(from - oldest).unwrap_or(self.lines.len());

        LogSlice {
            lines: self.lines.range(offset..).cloned().collect(),
            next: LogCursor(self.appended),
            skipped: oldest.saturating_sub(cursor.0),
        }
    }

    /// Cursor positioned after the newest line.
    pub const fn cursor(&self) -> LogCursor {
        LogCursor(self.appended)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Thread-safe handle to a [`LogBuffer`]; clones share the same buffer.
#[derive(Debug, Clone)]
pub struct SharedLogBuffer {
    inner: Arc<RwLock<LogBuffer>>,
}

impl SharedLogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LogBuffer::new(capacity))),
        }
    }

    /// Append a line (sync - can be called from any task or thread).
    pub fn add_log(&self, line: impl Into<String>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.into());
    }

    /// Copy of all retained lines.
    pub fn get_logs(&self) -> Vec<String> {
        self.read(LogBuffer::snapshot)
    }

    /// Retained lines after buffer index `index`.
    pub fn get_logs_since(&self, index: usize) -> Vec<String> {
        self.read(|buffer| buffer.since(index))
    }

    /// Retained lines from `cursor` on, with the cursor to resume from.
    pub fn read_since(&self, cursor: LogCursor) -> LogSlice {
        self.read(|buffer| buffer.read_since(cursor))
    }

    pub fn cursor(&self) -> LogCursor {
        self.read(LogBuffer::cursor)
    }

    pub fn len(&self) -> usize {
        self.read(LogBuffer::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(LogBuffer::is_empty)
    }

    fn read<T>(&self, f: impl FnOnce(&LogBuffer) -> T) -> T {
        f(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(capacity: usize, lines: &[&str]) -> LogBuffer {
        let mut buffer = LogBuffer::new(capacity);
        for line in lines {
            buffer.push((*line).to_string());
        }
        buffer
    }

    #[test]
    fn test_eviction_keeps_most_recent_lines() {
        let buffer = buffer_with(3, &["a", "b", "c", "d"]);
        assert_eq!(buffer.snapshot(), vec!["b", "c", "d"]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_since_returns_suffix() {
        let buffer = buffer_with(5, &["a", "b", "c"]);
        assert_eq!(buffer.since(0), vec!["a", "b", "c"]);
        assert_eq!(buffer.since(1), vec!["b", "c"]);
        assert!(buffer.since(3).is_empty());
        assert!(buffer.since(10).is_empty());
    }

    #[test]
    fn test_read_since_tracks_across_eviction() {
        let mut buffer = buffer_with(2, &["a", "b"]);
        let first = buffer.read_since(LogCursor::START);
        assert_eq!(first.lines, vec!["a", "b"]);
        assert_eq!(first.next, LogCursor::new(2));

        buffer.push("c".to_string());
        buffer.push("d".to_string());

        let second = buffer.read_since(first.next);
        assert_eq!(second.lines, vec!["c", "d"]);
        assert_eq!(second.skipped, 0);
        assert_eq!(second.next, LogCursor::new(4));
    }

    #[test]
    fn test_read_since_reports_skipped_lines() {
        let buffer = buffer_with(2, &["a", "b", "c", "d", "e"]);
        let slice = buffer.read_since(LogCursor::new(1));
        assert_eq!(slice.lines, vec!["d", "e"]);
        assert_eq!(slice.skipped, 2);
    }

    #[test]
    fn test_read_since_at_head_is_empty() {
        let buffer = buffer_with(4, &["a"]);
        let slice = buffer.read_since(buffer.cursor());
        assert!(slice.lines.is_empty());
        assert_eq!(slice.next, buffer.cursor());
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let buffer = buffer_with(0, &["a", "b"]);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_shared_buffer_clones_share_state() {
        let logs = SharedLogBuffer::new(10);
        let writer = logs.clone();
        writer.add_log("hello");
        assert_eq!(logs.get_logs(), vec!["hello"]);
        assert_eq!(logs.cursor(), LogCursor::new(1));
        assert!(!logs.is_empty());
    }

    #[test]
    fn test_shared_buffer_snapshot_is_a_copy() {
        let logs = SharedLogBuffer::new(2);
        logs.add_log("a");
        let snapshot = logs.get_logs();
        logs.add_log("b");
        logs.add_log("c");
        assert_eq!(snapshot, vec!["a"]);
        assert_eq!(logs.get_logs_since(1), vec!["c"]);
    }
}
