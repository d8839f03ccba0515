//! Command-line flags.
//!
//! Every flag can also be set through an `MCHOST_*` environment variable
//! (a `.env` file in the working directory is loaded first).

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use mchost_axum::bootstrap::DEFAULT_PORT;
use mchost_core::{
    DEFAULT_JAR_PATH, DEFAULT_MAX_LOG_LINES, DEFAULT_MEMORY_MB, DEFAULT_STOP_COMMAND,
};

/// Host a Minecraft server behind a small web panel.
#[derive(Debug, Parser)]
#[command(name = "mchost")]
#[command(about = "Run a Minecraft server behind a web control panel")]
#[command(version)]
pub struct Cli {
    /// HTTP server port
    #[arg(long, env = "MCHOST_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Java executable (name on PATH or a path)
    #[arg(long, env = "MCHOST_JAVA", default_value = "java")]
    pub java: String,

    /// Path to the server jar
    #[arg(long, env = "MCHOST_JAR", default_value = DEFAULT_JAR_PATH)]
    pub jar: PathBuf,

    /// Maximum heap in megabytes (-Xmx)
    #[arg(long, env = "MCHOST_MEMORY", default_value_t = DEFAULT_MEMORY_MB)]
    pub memory: u32,

    /// Number of log lines kept in memory
    #[arg(
        long = "max-logs",
        env = "MCHOST_MAX_LOGS",
        default_value_t = DEFAULT_MAX_LOG_LINES
    )]
    pub max_logs: usize,

    /// Use the G1 garbage collector
    #[arg(
        long = "g1gc",
        env = "MCHOST_G1GC",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub g1gc: bool,

    /// Pass the -server JVM flag
    #[arg(
        long = "jvm-server",
        env = "MCHOST_JVM_SERVER",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub jvm_server: bool,

    /// Directory served as the web panel
    #[arg(long, env = "MCHOST_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Console command used for a graceful stop
    #[arg(
        long = "stop-command",
        env = "MCHOST_STOP_COMMAND",
        default_value = DEFAULT_STOP_COMMAND
    )]
    pub stop_command: String,

    /// Restart the server automatically when it exits on its own
    #[arg(long, env = "MCHOST_AUTO_RESTART")]
    pub auto_restart: bool,

    /// Seconds to wait before an automatic restart
    #[arg(long, env = "MCHOST_AUTO_RESTART_DELAY", default_value_t = 5)]
    pub auto_restart_delay: u64,

    /// Seconds to wait for a graceful stop on shutdown before killing
    #[arg(long, env = "MCHOST_SHUTDOWN_GRACE", default_value_t = 30)]
    pub shutdown_grace: u64,

    /// Working directory of the server process
    #[arg(long, env = "MCHOST_WORKING_DIR")]
    pub working_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
