//! Axum web server adapter for mchost.
//!
//! Exposes the [`ServerSupervisor`](mchost_runtime::ServerSupervisor) over
//! HTTP: lifecycle control, console commands, an HTML status badge, log
//! history and a live SSE log stream, plus static assets for the web panel.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Only exercised by unit and integration tests
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod presentation;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, ServerConfig, start_server};
pub use error::HttpError;
pub use routes::{create_router, create_static_router};
pub use state::AppState;
