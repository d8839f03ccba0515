//! Java server invocation.

use std::process::Stdio;

use mchost_core::LaunchConfig;
use tokio::process::Command;
use tracing::info;

/// Build the launch command with all three standard streams piped.
///
/// The child is killed if its handle is dropped without being reaped, so a
/// torn-down runtime never leaves an orphaned server behind.
pub(crate) fn build_server_command(config: &LaunchConfig) -> Command {
    let args = config.java_args();
    info!(java = %config.java_path.display(), ?args, "Building Java command");

    let mut cmd = Command::new(&config.java_path);
    cmd.args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }

    cmd
}
