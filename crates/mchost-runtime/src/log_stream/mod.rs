//! Live log distribution.
//!
//! Each observer gets its own [`LogStreamSession`] that polls the supervisor's
//! log buffer and status. [`open_log_stream`] drives a session on tick
//! intervals and exposes it as a `Stream` that transports (SSE, tests) can
//! consume directly.

mod events;
mod session;

pub use events::{CONNECTED_MESSAGE, HEARTBEAT_PAYLOAD, LogStreamConfig, LogStreamEvent};
pub use session::LogStreamSession;

use async_stream::stream;
use futures_core::Stream;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::process::ServerSupervisor;

/// Open a log stream for one observer.
///
/// The stream starts with the connect events, then yields status changes
/// and batched new lines every `poll_interval` and a heartbeat every
/// `heartbeat_interval`. It ends when `cancel` fires; dropping it also
/// stops all work.
pub fn open_log_stream(
    supervisor: ServerSupervisor,
    config: LogStreamConfig,
    cancel: CancellationToken,
) -> impl Stream<Item = LogStreamEvent> + Send + 'static {
    stream! {
        if cancel.is_cancelled() {
            return;
        }

        let (mut session, initial) = LogStreamSession::connect(supervisor);
        for event in initial {
            yield event;
        }

        let mut poll = interval(config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut heartbeat = interval_at(
            Instant::now() + config.heartbeat_interval,
            config.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!("Log stream cancelled");
                    break;
                }
                _ = heartbeat.tick() => {
                    yield LogStreamEvent::Heartbeat;
                }
                _ = poll.tick() => {
                    for event in session.poll() {
                        yield event;
                    }
                }
            }
        }
    }
}
