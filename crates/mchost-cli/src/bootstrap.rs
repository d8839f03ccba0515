//! Turns parsed flags into validated runtime configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mchost_axum::ServerConfig;
use mchost_core::LaunchConfig;
use tracing::info;

use crate::error::CliError;
use crate::parser::Cli;

/// Resolve the java executable on `PATH` (or check an explicit path).
pub fn resolve_java(java: &str) -> Result<PathBuf, CliError> {
    which::which(java)
        .map_err(|e| CliError::Config(format!("java executable not found: {java} ({e})")))
}

/// Make sure the server jar exists, relative to `working_dir` when given.
pub fn check_jar(jar: &Path, working_dir: Option<&Path>) -> Result<(), CliError> {
    let resolved = match working_dir {
        Some(dir) if jar.is_relative() => dir.join(jar),
        _ => jar.to_path_buf(),
    };

    match std::fs::metadata(&resolved) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(CliError::Config(format!(
            "server jar is not a file: {}",
            resolved.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CliError::Config(format!(
            "server jar not found at {}",
            resolved.display()
        ))),
        Err(e) => Err(CliError::Io(format!(
            "error accessing server jar {}: {e}",
            resolved.display()
        ))),
    }
}

/// Build and validate the launch configuration from flags.
pub fn launch_config(cli: &Cli) -> Result<LaunchConfig, CliError> {
    let java = resolve_java(&cli.java)?;
    check_jar(&cli.jar, cli.working_dir.as_deref())?;

    let mut config = LaunchConfig::new(java, &cli.jar)
        .with_memory_mb(cli.memory)
        .with_max_log_lines(cli.max_logs)
        .with_g1gc(cli.g1gc)
        .with_server_flag(cli.jvm_server)
        .with_stop_command(cli.stop_command.clone())
        .with_auto_restart(cli.auto_restart)
        .with_auto_restart_delay(Duration::from_secs(cli.auto_restart_delay));
    if let Some(dir) = &cli.working_dir {
        config = config.with_working_dir(dir);
    }

    config.validate()?;
    Ok(config)
}

/// HTTP server configuration from flags.
pub fn server_config(cli: &Cli) -> ServerConfig {
    ServerConfig::default()
        .with_port(cli.port)
        .with_static_dir(&cli.static_dir)
        .with_shutdown_grace(Duration::from_secs(cli.shutdown_grace))
}

/// Log the effective configuration once at startup.
pub fn log_configuration(config: &LaunchConfig, server: &ServerConfig) {
    info!("Configuration:");
    info!("  Java Path: {}", config.java_path.display());
    info!("  Server Jar: {}", config.jar_path.display());
    info!("  Memory: {} MB", config.memory_mb);
    info!("  Max Log Lines: {}", config.max_log_lines);
    info!("  Use G1GC: {}", config.use_g1gc);
    info!("  JVM Server Flag: {}", config.server_flag);
    info!("  Stop Command: {}", config.stop_command);
    info!(
        "  Auto-restart: {} (delay {:?})",
        config.auto_restart, config.auto_restart_delay
    );
    if let Some(dir) = &config.working_dir {
        info!("  Working Dir: {}", dir.display());
    }
    info!("  HTTP Port: {}", server.port);
}
