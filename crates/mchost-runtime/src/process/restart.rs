//! Tokio-backed auto-restart scheduling.

use std::time::Duration;

use mchost_core::{RestartFuture, RestartScheduler};
use tracing::debug;

/// Runs each restart attempt on a detached task after a fixed sleep.
///
/// Must be used from inside a tokio runtime (the exit monitor always is).
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioRestartScheduler;

impl RestartScheduler for TokioRestartScheduler {
    fn schedule(&self, delay: Duration, restart: RestartFuture) {
        tokio::spawn(async move {
            debug!(?delay, "Waiting before auto-restart");
            tokio::time::sleep(delay).await;
            restart.await;
        });
    }
}
