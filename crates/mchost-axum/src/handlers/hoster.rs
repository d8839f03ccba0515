//! Hoster handlers - shutting down the whole host process.

use axum::extract::State;
use mchost_core::ServerStatus;
use tracing::{info, warn};

use crate::error::HttpError;
use crate::state::AppState;

/// Stop the game server, then shut the HTTP server down.
///
/// Responds immediately; a background task waits for the game server to
/// exit (killing it after the configured grace period) and then cancels the
/// server's shutdown token.
pub async fn shutdown(State(state): State<AppState>) -> Result<&'static str, HttpError> {
    if state.supervisor.status() == ServerStatus::Running {
        state.supervisor.stop().await.inspect_err(|e| {
            warn!(error = %e, "Failed to stop server for hoster shutdown");
        })?;
    }

    info!("Hoster shutdown requested");
    state.supervisor.add_log("Hoster shutdown requested");

    let supervisor = state.supervisor.clone();
    let grace = state.shutdown_grace;
    let token = state.shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = supervisor.shutdown(grace).await {
            warn!(error = %e, "Game server did not shut down cleanly");
        }
        info!("Game server stopped, shutting down hoster");
        token.cancel();
    });

    Ok("Initiating shutdown sequence...")
}
