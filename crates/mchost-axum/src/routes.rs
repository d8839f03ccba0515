//! Route definitions and router construction.

use axum::Router;
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bootstrap::AxumContext;
use crate::handlers;
use crate::state::AppState;

/// The panel may be served from anywhere, so the API accepts any origin.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// All API routes without the `/api` prefix (nested under `/api` by the caller).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Lifecycle
        .route("/server/start", post(handlers::server::start))
        .route("/server/stop", post(handlers::server::stop))
        .route("/server/force-stop", post(handlers::server::force_stop))
        .route("/server/restart", post(handlers::server::restart))
        .route("/server/command", post(handlers::server::command))
        .route("/server/status", get(handlers::server::status))
        // Auto-restart
        .route(
            "/server/auto-restart",
            post(handlers::server::toggle_auto_restart),
        )
        .route(
            "/server/auto-restart/status",
            get(handlers::server::auto_restart_status),
        )
        // Logs
        .route("/server/logs", get(handlers::logs::stream))
        .route("/server/logs/history", get(handlers::logs::history))
        // Hoster
        .route("/hoster/shutdown", post(handlers::hoster::shutdown))
}

/// Create the main router: `/health` plus every API route under `/api`.
pub fn create_router(ctx: AxumContext) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer();

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state).layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Create a router that also serves the panel's static assets.
///
/// API routes take priority; every other path is looked up in `static_dir`.
pub fn create_static_router<P: AsRef<Path>>(ctx: AxumContext, static_dir: P) -> Router {
    create_router(ctx).fallback_service(ServeDir::new(static_dir.as_ref()))
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
