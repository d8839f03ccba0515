//! Server handlers - lifecycle control, console commands and status.

use axum::Json;
use axum::extract::{Form, State};
use axum::response::Html;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::HttpError;
use crate::presentation::status_badge;
use crate::state::AppState;

/// Body of the auto-restart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoRestartResponse {
    pub enabled: bool,
}

/// Form body of `/api/server/command`.
#[derive(Debug, Default, Deserialize)]
pub struct CommandForm {
    pub command: Option<String>,
}

/// Start the game server.
pub async fn start(State(state): State<AppState>) -> Result<&'static str, HttpError> {
    state.supervisor.start().await.inspect_err(|e| {
        warn!(error = %e, "Failed to start server");
    })?;
    Ok("Server starting...")
}

/// Ask the game server to stop gracefully.
pub async fn stop(State(state): State<AppState>) -> Result<&'static str, HttpError> {
    state.supervisor.stop().await.inspect_err(|e| {
        warn!(error = %e, "Failed to stop server");
    })?;
    Ok("Server stopping")
}

/// Kill the game server immediately.
pub async fn force_stop(State(state): State<AppState>) -> Result<&'static str, HttpError> {
    state.supervisor.force_stop().await.inspect_err(|e| {
        warn!(error = %e, "Failed to force-stop server");
    })?;
    Ok("Server force-stopped")
}

/// Stop, wait for exit, start again.
pub async fn restart(State(state): State<AppState>) -> Result<&'static str, HttpError> {
    state.supervisor.restart().await.inspect_err(|e| {
        warn!(error = %e, "Failed to restart server");
    })?;
    Ok("Server restarting...")
}

/// Send a console command to the game server.
pub async fn command(
    State(state): State<AppState>,
    Form(form): Form<CommandForm>,
) -> Result<(), HttpError> {
    let command = form
        .command
        .filter(|c| !c.is_empty())
        .ok_or_else(|| HttpError::BadRequest("Command cannot be empty".to_string()))?;

    state
        .supervisor
        .execute_command(&command)
        .await
        .inspect_err(|e| warn!(error = %e, "Failed to execute command"))?;
    info!(command = %command, "Console command executed");
    Ok(())
}

/// Current status as an HTML badge.
pub async fn status(State(state): State<AppState>) -> Html<String> {
    Html(status_badge(state.supervisor.status()))
}

/// Flip auto-restart and return the new value.
pub async fn toggle_auto_restart(State(state): State<AppState>) -> Json<AutoRestartResponse> {
    let enabled = state.supervisor.toggle_auto_restart().await;
    Json(AutoRestartResponse { enabled })
}

pub async fn auto_restart_status(State(state): State<AppState>) -> Json<AutoRestartResponse> {
    let enabled = state.supervisor.auto_restart().await;
    Json(AutoRestartResponse { enabled })
}
