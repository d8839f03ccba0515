//! Command-line entry point for mchost.
//!
//! Parses flags (with `MCHOST_*` environment fallbacks), validates the
//! launch configuration and wires the supervisor into the HTTP server.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Only exercised by unit tests
#[cfg(test)]
use tempfile as _;

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use mchost_runtime as _;
use tokio as _;
use tokio_util as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod parser;

pub use bootstrap::{launch_config, server_config};
pub use error::CliError;
pub use parser::Cli;
