//! Composition root for the HTTP shell.
//!
//! Wires a [`ServerSupervisor`] into the router and runs it with graceful
//! shutdown driven by a [`CancellationToken`].

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use mchost_runtime::{LogStreamConfig, ServerSupervisor};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default grace period for the server to stop before it is killed.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Directory served for every path not claimed by the API.
    pub static_dir: Option<PathBuf>,
    pub stream_config: LogStreamConfig,
    /// How long the hoster shutdown waits for a graceful stop before killing.
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            stream_config: LogStreamConfig::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the static directory for panel assets.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

/// Services shared by all handlers.
#[derive(Debug, Clone)]
pub struct AxumContext {
    pub supervisor: ServerSupervisor,
    pub stream_config: LogStreamConfig,
    pub shutdown_grace: Duration,
    /// Cancelled to shut the HTTP server down; every open log stream holds a
    /// child token so streams end with it.
    pub shutdown: CancellationToken,
}

impl AxumContext {
    pub fn new(
        supervisor: ServerSupervisor,
        config: &ServerConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            supervisor,
            stream_config: config.stream_config,
            shutdown_grace: config.shutdown_grace,
            shutdown,
        }
    }
}

/// Start the HTTP server and run until `shutdown` is cancelled.
///
/// Cancellation can come from the caller (e.g. Ctrl-C) or from the
/// `/api/hoster/shutdown` endpoint. In-flight requests finish; open log
/// streams end.
pub async fn start_server(
    supervisor: ServerSupervisor,
    config: ServerConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    let ctx = AxumContext::new(supervisor, &config, shutdown.clone());

    let app = if let Some(ref static_dir) = config.static_dir {
        tokio::fs::create_dir_all(static_dir).await.with_context(|| {
            format!("failed to create static directory {}", static_dir.display())
        })?;
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_static_router(ctx, static_dir)
    } else {
        crate::routes::create_router(ctx)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("mchost web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
