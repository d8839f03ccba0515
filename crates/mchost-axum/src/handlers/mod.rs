//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that delegate to the `ServerSupervisor`.

pub mod hoster;
pub mod logs;
pub mod server;
