//! Launch configuration for the supervised server.
//!
//! `LaunchConfig` is built once at startup (usually by the CLI) and handed to
//! the supervisor, which never mutates it. Path existence is checked by the
//! caller; [`LaunchConfig::validate`] only enforces the invariants that do not
//! need the filesystem.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Server jar launched when no `--jar` is given.
pub const DEFAULT_JAR_PATH: &str = "fabric-server-mc.1.20.1-loader.0.16.5-launcher.1.0.1.jar";

/// Default heap budget (8 GB).
pub const DEFAULT_MEMORY_MB: u32 = 8192;

/// Default number of log lines retained in memory.
pub const DEFAULT_MAX_LOG_LINES: usize = 1000;

/// Console command that asks the server to save and exit.
pub const DEFAULT_STOP_COMMAND: &str = "stop";

/// Fixed backoff before an auto-restart attempt.
pub const DEFAULT_AUTO_RESTART_DELAY: Duration = Duration::from_secs(5);

/// Immutable launch parameters for the supervised Java server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Java executable (resolved path or a name looked up on `PATH`).
    pub java_path: PathBuf,
    /// Server jar passed to `-jar`.
    pub jar_path: PathBuf,
    /// Maximum heap in megabytes (`-Xmx<N>M`).
    pub memory_mb: u32,
    /// Pass `-XX:+UseG1GC`.
    pub use_g1gc: bool,
    /// Pass `-server`.
    pub server_flag: bool,
    /// Capacity of the in-memory log buffer.
    pub max_log_lines: usize,
    /// Text written to stdin for a graceful stop.
    pub stop_command: String,
    /// Delay before a scheduled auto-restart.
    pub auto_restart_delay: Duration,
    /// Working directory for the child; inherits ours when `None`.
    pub working_dir: Option<PathBuf>,
    /// Initial value of the auto-restart flag.
    pub auto_restart: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            java_path: PathBuf::from("java"),
            jar_path: PathBuf::from(DEFAULT_JAR_PATH),
            memory_mb: DEFAULT_MEMORY_MB,
            use_g1gc: true,
            server_flag: true,
            max_log_lines: DEFAULT_MAX_LOG_LINES,
            stop_command: DEFAULT_STOP_COMMAND.to_string(),
            auto_restart_delay: DEFAULT_AUTO_RESTART_DELAY,
            working_dir: None,
            auto_restart: false,
        }
    }
}

impl LaunchConfig {
    /// Create a config for the given java executable and jar, with defaults
    /// for everything else.
    pub fn new(java_path: impl Into<PathBuf>, jar_path: impl Into<PathBuf>) -> Self {
        Self {
            java_path: java_path.into(),
            jar_path: jar_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_memory_mb(mut self, memory_mb: u32) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    #[must_use]
    pub const fn with_max_log_lines(mut self, max_log_lines: usize) -> Self {
        self.max_log_lines = max_log_lines;
        self
    }

    #[must_use]
    pub const fn with_g1gc(mut self, enabled: bool) -> Self {
        self.use_g1gc = enabled;
        self
    }

    #[must_use]
    pub const fn with_server_flag(mut self, enabled: bool) -> Self {
        self.server_flag = enabled;
        self
    }

    #[must_use]
    pub fn with_stop_command(mut self, command: impl Into<String>) -> Self {
        self.stop_command = command.into();
        self
    }

    #[must_use]
    pub const fn with_auto_restart_delay(mut self, delay: Duration) -> Self {
        self.auto_restart_delay = delay;
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn with_auto_restart(mut self, enabled: bool) -> Self {
        self.auto_restart = enabled;
        self
    }

    /// Check the invariants that do not depend on the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.java_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyJavaPath);
        }
        if self.jar_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyJarPath);
        }
        if self.memory_mb == 0 {
            return Err(ConfigError::InvalidMemory);
        }
        if self.max_log_lines == 0 {
            return Err(ConfigError::InvalidMaxLogLines);
        }
        if self.stop_command.trim().is_empty() {
            return Err(ConfigError::EmptyStopCommand);
        }
        Ok(())
    }

    /// JVM arguments in launch order.
    ///
    /// `[-server] -Xmx<N>M [-XX:+UseG1GC] -jar <jar> nogui`
    pub fn java_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(6);

        if self.server_flag {
            args.push("-server".to_string());
        }

        args.push(format!("-Xmx{}M", self.memory_mb));

        if self.use_g1gc {
            args.push("-XX:+UseG1GC".to_string());
        }

        args.push("-jar".to_string());
        args.push(self.jar_path.to_string_lossy().into_owned());
        args.push("nogui".to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LaunchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_java_args_with_all_flags() {
        let config = LaunchConfig::new("java", "server.jar").with_memory_mb(2048);
        assert_eq!(
            config.java_args(),
            vec![
                "-server",
                "-Xmx2048M",
                "-XX:+UseG1GC",
                "-jar",
                "server.jar",
                "nogui",
            ]
        );
    }

    #[test]
    fn test_java_args_without_optional_flags() {
        let config = LaunchConfig::new("java", "server.jar")
            .with_memory_mb(512)
            .with_g1gc(false)
            .with_server_flag(false);
        assert_eq!(
            config.java_args(),
            vec!["-Xmx512M", "-jar", "server.jar", "nogui"]
        );
    }

    #[test]
    fn test_validate_rejects_zero_memory() {
        let config = LaunchConfig::default().with_memory_mb(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMemory)));
    }

    #[test]
    fn test_validate_rejects_zero_log_lines() {
        let config = LaunchConfig::default().with_max_log_lines(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxLogLines)
        ));
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = LaunchConfig::new("", "server.jar");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyJavaPath)));

        let config = LaunchConfig::new("java", "");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyJarPath)));
    }

    #[test]
    fn test_validate_rejects_blank_stop_command() {
        let config = LaunchConfig::default().with_stop_command("  ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyStopCommand)
        ));
    }
}
