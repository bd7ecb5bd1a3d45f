use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;

use crate::invocation::Invocation;

mod docker;
pub use docker::Docker;

#[async_trait]
pub trait Engine {
    /// Fails with a `RuntimeInvocationError` if the runtime cannot be started.
    async fn check(&self) -> Result<()>;
    async fn run(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

/// Command sharing our stdio, so the session is interactive.
pub(crate) fn new_command(invocation: &Invocation) -> Command {
    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    command
}

/// Exit code to report for the child, shell style for signals.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}
