//! Stdout/stderr ingestion into the log buffer.
//!
//! Game servers (and the JVM) occasionally emit non-UTF-8 bytes, so lines are
//! read as bytes and decoded lossily instead of going through
//! `BufReader::lines()`, which would end the reader on the first bad byte.
//! A single line is capped at [`MAX_LINE_BYTES`]; an overlong line ends the
//! reader for that stream (the process itself keeps running).

use std::fmt;
use std::io;
use std::time::Duration;

use mchost_core::SharedLogBuffer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Maximum length of a single log line, excluding the terminator.
pub(crate) const MAX_LINE_BYTES: usize = 16 * 1024;

/// How long the exit monitor waits for readers to hit EOF after the process
/// has exited. A grandchild that inherited the pipes can hold them open.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Which child stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Stdout,
    Stderr,
}

impl LogSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    source: LogSource,
    logs: SharedLogBuffer,
) -> JoinHandle<()> {
    tokio::spawn(read_lines(stream, source, logs))
}

/// Wait for reader tasks to finish, up to [`READER_DRAIN_TIMEOUT`].
///
/// Readers still running after the timeout are left detached.
pub(crate) async fn drain_readers(readers: Vec<JoinHandle<()>>) {
    let joined = tokio::time::timeout(READER_DRAIN_TIMEOUT, async {
        for reader in readers {
            if let Err(e) = reader.await {
                warn!(error = %e, "Log reader task failed");
            }
        }
    })
    .await;

    if joined.is_err() {
        debug!(timeout = ?READER_DRAIN_TIMEOUT, "Log readers still open after process exit");
    }
}

/// Append every line of `stream` to `logs` until EOF or a read error.
pub(crate) async fn read_lines(
    stream: impl AsyncRead + Unpin,
    source: LogSource,
    logs: SharedLogBuffer,
) {
    let mut reader = BufReader::new(stream);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match read_bounded_line(&mut reader, &mut buf).await {
            Ok(Some(line)) => {
                debug!(%source, "Server output: {}", line);
                logs.add_log(line);
            }
            Ok(None) => break, // EOF
            Err(e) => {
                warn!(%source, error = %e, "Error reading logs");
                logs.add_log(format!("Error reading logs: {e}"));
                break;
            }
        }
    }

    trace!(%source, "log stream reader task exiting");
}

/// Read one line (without terminator), or `None` at EOF.
async fn read_bounded_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    // One extra byte leaves room for the newline of a maximum-length line
    let limit = MAX_LINE_BYTES as u64 + 1;
    let read = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > MAX_LINE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {MAX_LINE_BYTES} bytes"),
        ));
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}
