//! Lifecycle state machine for the supervised server process.
//!
//! All mutable state lives in one `SupervisorState` behind a tokio `RwLock`.
//! Control operations take the write lock for their whole critical section,
//! so at most one of start/stop/force-stop/restart/execute runs at a time.
//! Every status transition is also published on a `watch` channel, which
//! gives lock-free status reads and lets `restart`/`shutdown` wait for
//! `Stopped` without polling.
//!
//! Per process lifetime, `start` spawns three tasks: one reader per output
//! stream and one exit monitor. Only the monitor ever moves the status back
//! to `Stopped`, and it joins both readers before logging the exit.

use std::future::Future;
use std::process::ExitStatus;
use std::sync::Arc;

use mchost_core::{
    ConfigError, ExitCause, ExitReport, LaunchConfig, RestartScheduler, ServerStatus,
    SharedLogBuffer, SupervisorError,
};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tokio::sync::{RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::command::build_server_command;
use super::handle::{KillRequest, ProcessHandle, wait_for_exit};
use super::restart::TokioRestartScheduler;
use super::stream::{LogSource, drain_readers, spawn_stream_reader};

/// Line appended to the log buffer whenever the process exits.
pub const STOPPED_LOG_LINE: &str = "Server process has stopped";

/// How the current process was asked to go away, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopRequest {
    Graceful,
    Forced,
}

/// Mutable supervisor state, guarded by `Inner::state`.
///
/// Invariant: `process` is `Some` iff `status != Stopped`. `stdin` follows
/// `process`: it stays open through `Stopping` (the stop command has already
/// been written) and is dropped when the exit monitor moves to `Stopped`.
#[derive(Debug, Default)]
struct SupervisorState {
    status: ServerStatus,
    process: Option<ProcessHandle>,
    stdin: Option<ChildStdin>,
    auto_restart: bool,
    stop_request: Option<StopRequest>,
    last_exit: Option<ExitReport>,
}

struct Inner {
    config: LaunchConfig,
    state: RwLock<SupervisorState>,
    logs: SharedLogBuffer,
    status_tx: watch::Sender<ServerStatus>,
    scheduler: Arc<dyn RestartScheduler>,
}

/// Supervisor for a single game server process.
///
/// Cheap to clone; clones share the same process, state and log buffer.
/// Construct one per host process and hand clones to every consumer.
#[derive(Clone)]
pub struct ServerSupervisor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ServerSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSupervisor")
            .field("status", &self.status())
            .field("jar_path", &self.inner.config.jar_path)
            .finish_non_exhaustive()
    }
}

impl ServerSupervisor {
    /// Create a supervisor that schedules auto-restarts on the tokio runtime.
    pub fn new(config: LaunchConfig) -> Result<Self, ConfigError> {
        Self::with_scheduler(config, Arc::new(TokioRestartScheduler))
    }

    /// Create a supervisor with a custom auto-restart scheduler.
    pub fn with_scheduler(
        config: LaunchConfig,
        scheduler: Arc<dyn RestartScheduler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (status_tx, _) = watch::channel(ServerStatus::Stopped);
        let state = SupervisorState {
            auto_restart: config.auto_restart,
            ..SupervisorState::default()
        };

        Ok(Self {
            inner: Arc::new(Inner {
                logs: SharedLogBuffer::new(config.max_log_lines),
                config,
                state: RwLock::new(state),
                status_tx,
                scheduler,
            }),
        })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.inner.config
    }

    /// Shared handle to the log buffer.
    pub fn logs(&self) -> &SharedLogBuffer {
        &self.inner.logs
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Launch the server. Only valid from `Stopped`.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        let mut state = self.inner.state.write().await;
        info!(status = %state.status, "Start requested");

        if state.status != ServerStatus::Stopped {
            return Err(SupervisorError::invalid_state("start", state.status));
        }

        let mut command = build_server_command(&self.inner.config);
        self.transition(&mut state, ServerStatus::Starting);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "Failed to start process");
                state.stdin = None;
                state.process = None;
                self.transition(&mut state, ServerStatus::Stopped);
                return Err(SupervisorError::SpawnFailed(e.to_string()));
            }
        };

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_stream_reader(stdout, LogSource::Stdout, self.inner.logs.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_stream_reader(stderr, LogSource::Stderr, self.inner.logs.clone()));
        }

        let pid = child.id();
        let (kill_tx, kill_rx) = mpsc::channel(1);
        state.stdin = child.stdin.take();
        state.process = Some(ProcessHandle::new(pid, kill_tx));
        state.stop_request = None;

        tokio::spawn(self.clone().monitor_process(child, kill_rx, readers));

        self.transition(&mut state, ServerStatus::Running);
        info!(pid = ?pid, "Server started successfully");
        Ok(())
    }

    /// Ask the server to stop by writing the stop command to its stdin.
    ///
    /// Returns once the command is written; the status stays `Stopping`
    /// until the exit monitor observes the process exit.
    pub async fn stop(&self) -> Result<(), SupervisorError> {
        let mut state = self.inner.state.write().await;
        self.request_stop(&mut state, "stop").await
    }

    /// Kill the process immediately.
    pub async fn force_stop(&self) -> Result<(), SupervisorError> {
        let mut state = self.inner.state.write().await;
        info!(status = %state.status, "Force stop requested");

        if state.status == ServerStatus::Stopped {
            return Err(SupervisorError::NotRunning);
        }
        let Some(process) = state.process.as_ref() else {
            return Err(SupervisorError::NotRunning);
        };

        let pid = process.pid();
        process.kill().await.map_err(|e| {
            warn!(pid = ?pid, error = %e, "Failed to kill process");
            SupervisorError::KillFailed(e.to_string())
        })?;

        state.stop_request = Some(StopRequest::Forced);
        self.transition(&mut state, ServerStatus::Stopping);
        info!(pid = ?pid, "Force stop successful");
        Ok(())
    }

    /// Stop the server, wait until it has exited, then start it again.
    ///
    /// The lock is released while waiting, so another caller may start the
    /// server in between; the final `start` then fails with `InvalidState`.
    pub async fn restart(&self) -> Result<(), SupervisorError> {
        let mut status_rx = {
            let mut state = self.inner.state.write().await;
            self.request_stop(&mut state, "restart").await?;
            self.inner.status_tx.subscribe()
        };

        wait_until_stopped(&mut status_rx).await?;
        info!("Server stopped, starting again");
        self.start().await
    }

    /// Send a console command to the server.
    pub async fn execute_command(&self, command: &str) -> Result<(), SupervisorError> {
        let mut state = self.inner.state.write().await;

        if state.status != ServerStatus::Running {
            return Err(SupervisorError::NotRunning);
        }

        write_line(state.stdin.as_mut(), command).await?;
        debug!(command, "Command sent to server");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Flags and observers
    // ------------------------------------------------------------------

    /// Flip the auto-restart flag and return the new value.
    pub async fn toggle_auto_restart(&self) -> bool {
        let mut state = self.inner.state.write().await;
        state.auto_restart = !state.auto_restart;
        info!(enabled = state.auto_restart, "Auto-restart toggled");
        state.auto_restart
    }

    pub async fn auto_restart(&self) -> bool {
        self.inner.state.read().await.auto_restart
    }

    /// Current status (snapshot of the last published transition).
    pub fn status(&self) -> ServerStatus {
        *self.inner.status_tx.borrow()
    }

    /// Receiver that observes every status transition.
    pub fn subscribe_status(&self) -> watch::Receiver<ServerStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Outcome of the most recent process lifetime.
    pub async fn last_exit(&self) -> Option<ExitReport> {
        self.inner.state.read().await.last_exit.clone()
    }

    /// PID of the running process, when there is one.
    pub async fn pid(&self) -> Option<u32> {
        self.inner
            .state
            .read()
            .await
            .process
            .as_ref()
            .and_then(ProcessHandle::pid)
    }

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    /// Inject a line into the log buffer (e.g. from the shutdown flow).
    pub fn add_log(&self, line: impl Into<String>) {
        let line = line.into();
        debug!(line = %line, "External log added");
        self.inner.logs.add_log(line);
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.inner.logs.get_logs()
    }

    pub fn get_logs_since(&self, index: usize) -> Vec<String> {
        self.inner.logs.get_logs_since(index)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn request_stop(
        &self,
        state: &mut SupervisorState,
        operation: &'static str,
    ) -> Result<(), SupervisorError> {
        info!(status = %state.status, operation, "Stop requested");

        if state.status != ServerStatus::Running {
            return Err(SupervisorError::invalid_state(operation, state.status));
        }

        write_line(state.stdin.as_mut(), &self.inner.config.stop_command)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to write stop command"))?;

        state.stop_request = Some(StopRequest::Graceful);
        self.transition(state, ServerStatus::Stopping);
        info!("Stop command sent successfully");
        Ok(())
    }

    /// Record a status change and publish it to watchers.
    fn transition(&self, state: &mut SupervisorState, to: ServerStatus) {
        let from = std::mem::replace(&mut state.status, to);
        if from != to {
            debug!(%from, %to, "Server status changed");
        }
        self.inner.status_tx.send_replace(to);
    }

    /// Wait for the child to exit and finalize state.
    ///
    /// Returns a `Send` future explicitly: `start` spawns this, and the
    /// auto-restart path spawns `start` again.
    fn monitor_process(
        self,
        mut child: Child,
        mut kill_rx: mpsc::Receiver<KillRequest>,
        readers: Vec<JoinHandle<()>>,
    ) -> impl Future<Output = ()> + Send + 'static {
        async move {
            debug!("Process monitor started");
            let exit = wait_for_exit(&mut child, &mut kill_rx).await;
            // Pending force-stops must see the process as gone from here on
            drop(kill_rx);

            let (was_running, auto_restart, report) = {
                let mut state = self.inner.state.write().await;
                let was_running = state.status == ServerStatus::Running;
                let cause = match state.stop_request.take() {
                    Some(StopRequest::Graceful) => ExitCause::Requested,
                    Some(StopRequest::Forced) => ExitCause::Killed,
                    None => ExitCause::Unexpected,
                };
                let report = ExitReport::new(cause, exit.as_ref().ok().and_then(ExitStatus::code));

                state.process = None;
                state.stdin = None;
                state.last_exit = Some(report.clone());
                self.transition(&mut state, ServerStatus::Stopped);
                (was_running, state.auto_restart, report)
            };

            match &exit {
                Ok(status) => info!(%status, cause = ?report.cause, "Process exited"),
                Err(e) => warn!(error = %e, "Failed to wait for process exit"),
            }

            // The stopped line goes after everything the process printed
            drain_readers(readers).await;
            self.inner.logs.add_log(STOPPED_LOG_LINE);

            if auto_restart && was_running {
                self.schedule_auto_restart();
            }
            debug!("Process monitor complete");
        }
    }

    /// Hand a single delayed `start` to the scheduler.
    fn schedule_auto_restart(&self) {
        let delay = self.inner.config.auto_restart_delay;
        info!(?delay, "Auto-restart enabled, scheduling restart");

        let supervisor = self.clone();
        self.inner.scheduler.schedule(
            delay,
            Box::pin(async move {
                if let Err(e) = supervisor.start().await {
                    warn!(error = %e, "Auto-restart failed");
                    supervisor.add_log(format!("Auto-restart failed: {e}"));
                }
            }),
        );
    }
}

/// Write `text` plus a newline to the child's stdin.
async fn write_line(stdin: Option<&mut ChildStdin>, text: &str) -> Result<(), SupervisorError> {
    let stdin = stdin.ok_or(SupervisorError::StreamUnavailable)?;

    let mut payload = String::with_capacity(text.len() + 1);
    payload.push_str(text);
    payload.push('\n');

    stdin
        .write_all(payload.as_bytes())
        .await
        .map_err(|e| SupervisorError::WriteFailed(e.to_string()))?;
    stdin
        .flush()
        .await
        .map_err(|e| SupervisorError::WriteFailed(e.to_string()))
}

/// Wait on a status receiver until it reports `Stopped`.
pub(super) async fn wait_until_stopped(
    status_rx: &mut watch::Receiver<ServerStatus>,
) -> Result<(), SupervisorError> {
    status_rx
        .wait_for(|status| *status == ServerStatus::Stopped)
        .await
        .map(|_| ())
        // The sender lives as long as the supervisor itself
        .map_err(|_| SupervisorError::NotRunning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use mchost_core::RestartFuture;

    fn missing_java_config() -> LaunchConfig {
        LaunchConfig::new("/nonexistent/bin/java", "server.jar").with_max_log_lines(3)
    }

    #[derive(Default)]
    struct RecordingScheduler {
        delays: Mutex<Vec<Duration>>,
    }

    impl RestartScheduler for RecordingScheduler {
        fn schedule(&self, delay: Duration, _restart: RestartFuture) {
            self.delays.lock().unwrap().push(delay);
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = missing_java_config().with_memory_mb(0);
        assert!(matches!(
            ServerSupervisor::new(config),
            Err(ConfigError::InvalidMemory)
        ));
    }

    #[tokio::test]
    async fn test_initial_state() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        assert_eq!(supervisor.status(), ServerStatus::Stopped);
        assert!(!supervisor.auto_restart().await);
        assert!(supervisor.last_exit().await.is_none());
        assert!(supervisor.pid().await.is_none());
        assert!(supervisor.get_logs().is_empty());
    }

    #[tokio::test]
    async fn test_initial_auto_restart_from_config() {
        let config = missing_java_config().with_auto_restart(true);
        let supervisor = ServerSupervisor::new(config).unwrap();
        assert!(supervisor.auto_restart().await);
    }

    #[tokio::test]
    async fn test_start_with_missing_binary_reverts_to_stopped() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, SupervisorError::SpawnFailed(_)));
        assert_eq!(supervisor.status(), ServerStatus::Stopped);
        assert!(supervisor.pid().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_when_stopped_is_invalid_state() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        let err = supervisor.stop().await.unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::InvalidState {
                operation: "stop",
                status: ServerStatus::Stopped
            }
        ));
    }

    #[tokio::test]
    async fn test_force_stop_when_stopped_is_not_running() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        let status_rx = supervisor.subscribe_status();

        let err = supervisor.force_stop().await.unwrap_err();
        assert!(matches!(err, SupervisorError::NotRunning));
        assert_eq!(supervisor.status(), ServerStatus::Stopped);
        assert!(!status_rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_restart_when_stopped_is_invalid_state() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        let err = supervisor.restart().await.unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::InvalidState {
                operation: "restart",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_execute_command_when_stopped_is_not_running() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        let err = supervisor.execute_command("say hi").await.unwrap_err();
        assert!(matches!(err, SupervisorError::NotRunning));
    }

    #[tokio::test]
    async fn test_toggle_auto_restart_twice_restores_value() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        let initial = supervisor.auto_restart().await;

        let toggled = supervisor.toggle_auto_restart().await;
        assert_eq!(toggled, !initial);
        assert_eq!(supervisor.auto_restart().await, toggled);

        assert_eq!(supervisor.toggle_auto_restart().await, initial);
        assert_eq!(supervisor.auto_restart().await, initial);
    }

    #[tokio::test]
    async fn test_add_log_respects_capacity() {
        let supervisor = ServerSupervisor::new(missing_java_config()).unwrap();
        for line in ["a", "b", "c", "d"] {
            supervisor.add_log(line);
        }
        assert_eq!(supervisor.get_logs(), vec!["b", "c", "d"]);
        assert_eq!(supervisor.get_logs_since(1), vec!["c", "d"]);
        assert!(supervisor.get_logs_since(3).is_empty());
    }

    #[tokio::test]
    async fn test_failed_start_does_not_schedule_restart() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let config = missing_java_config().with_auto_restart(true);
        let supervisor = ServerSupervisor::with_scheduler(config, scheduler.clone()).unwrap();

        assert!(supervisor.start().await.is_err());
        assert!(scheduler.delays.lock().unwrap().is_empty());
    }
}
