//! Host shutdown with stop-command → kill escalation.

use std::time::Duration;

use mchost_core::{ExitReport, ServerStatus, SupervisorError};
use tokio::time::timeout;
use tracing::{info, warn};

use super::supervisor::{ServerSupervisor, wait_until_stopped};

impl ServerSupervisor {
    /// Bring the server down for host shutdown.
    ///
    /// # Strategy
    /// 1. If running, send the stop command
    /// 2. Wait up to `grace` for the exit monitor to report `Stopped`
    /// 3. If still alive, force-kill and wait for the exit to be observed
    ///
    /// Returns the exit report of the final process lifetime, if there was one.
    pub async fn shutdown(&self, grace: Duration) -> Result<Option<ExitReport>, SupervisorError> {
        let mut status_rx = self.subscribe_status();

        if *status_rx.borrow_and_update() == ServerStatus::Stopped {
            return Ok(self.last_exit().await);
        }

        if self.status() == ServerStatus::Running {
            if let Err(e) = self.stop().await {
                // Raced with an exit or another stop; escalation below covers it
                warn!(error = %e, "Graceful stop failed during shutdown");
            }
        }

        match timeout(grace, wait_until_stopped(&mut status_rx)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(?grace, "Server did not stop within grace period, killing");
                match self.force_stop().await {
                    Ok(()) | Err(SupervisorError::NotRunning) => {}
                    Err(SupervisorError::KillFailed(e)) => {
                        // Exit already observed while the request was in flight
                        warn!(error = %e, "Kill during shutdown failed");
                    }
                    Err(e) => return Err(e),
                }
                wait_until_stopped(&mut status_rx).await?;
            }
        }

        info!("Server shut down");
        Ok(self.last_exit().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mchost_core::LaunchConfig;

    #[tokio::test]
    async fn shutdown_when_stopped_returns_immediately() {
        let supervisor =
            ServerSupervisor::new(LaunchConfig::new("/nonexistent/java", "server.jar")).unwrap();

        let report = supervisor.shutdown(Duration::from_secs(1)).await.unwrap();
        assert!(report.is_none());
        assert_eq!(supervisor.status(), ServerStatus::Stopped);
    }
}
