//! Kill channel between control calls and the exit monitor.
//!
//! The monitor task owns the `Child` because it has to await `wait()`. A
//! force-stop therefore cannot touch the child directly; it sends a request
//! over this channel and the monitor delivers the kill, replying with the
//! outcome. Once the monitor has observed the exit it drops the receiver, so
//! late requests fail instead of signalling a reaped (possibly reused) PID.

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};

/// Reply slot for a kill request.
pub(crate) type KillRequest = oneshot::Sender<io::Result<()>>;

/// Control-side handle to a running child.
#[derive(Debug)]
pub(crate) struct ProcessHandle {
    pid: Option<u32>,
    kill_tx: mpsc::Sender<KillRequest>,
}

impl ProcessHandle {
    pub(crate) const fn new(pid: Option<u32>, kill_tx: mpsc::Sender<KillRequest>) -> Self {
        Self { pid, kill_tx }
    }

    pub(crate) const fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Ask the monitor to kill the child and wait for the result.
    pub(crate) async fn kill(&self) -> io::Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.kill_tx
            .send(reply_tx)
            .await
            .map_err(|_| already_exited())?;
        reply_rx.await.map_err(|_| already_exited())?
    }
}

fn already_exited() -> io::Error {
    io::Error::other("process already exited")
}

/// Wait for the child to exit, serving kill requests in the meantime.
pub(crate) async fn wait_for_exit(
    child: &mut Child,
    kill_rx: &mut mpsc::Receiver<KillRequest>,
) -> io::Result<ExitStatus> {
    loop {
        tokio::select! {
            status = child.wait() => return status,
            Some(reply) = kill_rx.recv() => {
                // Caller may have given up; nothing to do then
                let _ = reply.send(child.start_kill());
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::process::Command;
    use tokio::time::timeout;

    #[tokio::test]
    async fn kill_request_terminates_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");
        let (kill_tx, mut kill_rx) = mpsc::channel(1);
        let handle = ProcessHandle::new(child.id(), kill_tx);

        let monitor = tokio::spawn(async move { wait_for_exit(&mut child, &mut kill_rx).await });

        handle.kill().await.expect("kill should be delivered");
        let status = timeout(Duration::from_secs(5), monitor)
            .await
            .expect("child should exit after kill")
            .unwrap()
            .unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    async fn kill_after_monitor_finished_fails() {
        let mut child = Command::new("true").spawn().expect("failed to spawn true");
        let (kill_tx, mut kill_rx) = mpsc::channel(1);
        let handle = ProcessHandle::new(child.id(), kill_tx);

        let status = wait_for_exit(&mut child, &mut kill_rx).await.unwrap();
        assert!(status.success());
        drop(kill_rx);

        let err = handle.kill().await.unwrap_err();
        assert_eq!(err.to_string(), "process already exited");
    }
}
