//! Log handlers - SSE live stream and JSON history.

use std::convert::Infallible;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderName;
use axum::http::header::HeaderValue;
use axum::response::sse::{Event, Sse};
use futures_util::stream::{Stream, StreamExt};
use mchost_runtime::{LogStreamEvent, open_log_stream};
use serde::Deserialize;
use tracing::debug;

use crate::presentation::status_badge;
use crate::state::AppState;

/// Disables response buffering in nginx-style reverse proxies.
const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Convert a log stream event into an SSE event.
///
/// The SSE `event:` field is the event type; status is sent as the HTML
/// badge. Carriage returns cannot be carried in SSE fields and are dropped.
pub fn to_sse_event(event: &LogStreamEvent) -> Event {
    let data = match event {
        LogStreamEvent::Status(status) => status_badge(*status),
        other => other.payload().replace('\r', ""),
    };
    Event::default().event(event.event_type()).data(data)
}

/// Stream status changes and new log lines via SSE.
///
/// Each connection gets its own session; the stream ends when the client
/// disconnects or the HTTP server shuts down.
pub async fn stream(
    State(state): State<AppState>,
) -> (
    [(HeaderName, HeaderValue); 1],
    Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>,
) {
    debug!("New log stream connection");
    let events = open_log_stream(
        state.supervisor.clone(),
        state.stream_config,
        state.shutdown.child_token(),
    )
    .map(|event| Ok(to_sse_event(&event)));

    (
        [(X_ACCEL_BUFFERING, HeaderValue::from_static("no"))],
        Sse::new(events),
    )
}

/// Query string of `/api/server/logs/history`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Buffer index to start from; all retained lines when absent.
    pub since: Option<usize>,
}

/// Retained log lines as a JSON array.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<String>> {
    let lines = match query.since {
        Some(index) => state.supervisor.get_logs_since(index),
        None => state.supervisor.get_logs(),
    };
    Json(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_strips_carriage_returns() {
        // Would panic inside axum if the CR reached the SSE field
        let _event = to_sse_event(&LogStreamEvent::Log("progress\r50%".to_string()));
    }
}
