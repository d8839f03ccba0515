//! CLI entry point - the composition root.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mchost_axum::start_server;
use mchost_cli::{Cli, CliError, bootstrap};
use mchost_runtime::ServerSupervisor;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolve on Ctrl-C; log and stay pending if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let launch = bootstrap::launch_config(&cli)?;
    let server = bootstrap::server_config(&cli);
    bootstrap::log_configuration(&launch, &server);

    let grace = Duration::from_secs(cli.shutdown_grace);
    let supervisor = ServerSupervisor::new(launch).map_err(CliError::from)?;
    let shutdown = CancellationToken::new();

    {
        let supervisor = supervisor.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = ctrl_c() => {
                    info!("Ctrl-C received, shutting down");
                    if let Err(e) = supervisor.shutdown(grace).await {
                        warn!(error = %e, "Game server did not shut down cleanly");
                    }
                    shutdown.cancel();
                }
                () = shutdown.cancelled() => {}
            }
        });
    }

    start_server(supervisor.clone(), server, shutdown.clone()).await?;

    // The HTTP server may also stop on its own (bind errors are returned above)
    if let Some(exit) = supervisor
        .shutdown(grace)
        .await
        .map_err(|e| CliError::Server(e.to_string()))?
    {
        info!(cause = ?exit.cause, code = ?exit.code, "Game server exited");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads MCHOST_*
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
