use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::engine::{new_command, Engine};
use crate::error::RuntimeInvocationError;
use crate::invocation::Invocation;

/// Runs invocations through a docker compatible CLI (docker, podman, ...).
///
/// `program` is the runtime itself, also when the invocation goes through
/// sudo, so `check` tells whether the runtime can be started.
pub struct Docker {
    program: String,
}

impl Docker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn unavailable(&self, source: std::io::Error) -> RuntimeInvocationError {
        RuntimeInvocationError {
            program: self.program.clone(),
            source,
        }
    }
}

#[async_trait]
impl Engine for Docker {
    async fn check(&self) -> Result<()> {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| self.unavailable(err))
            .context("no container runtime installed")?;
        Ok(())
    }

    async fn run(&self, invocation: &Invocation) -> Result<ExitStatus> {
        debug!("exec {} {:?}", invocation.program, invocation.args);

        let mut child = new_command(invocation)
            .spawn()
            .map_err(|source| RuntimeInvocationError {
                program: invocation.program.clone(),
                source,
            })
            .context("spawn container runtime")?;

        let status = child.wait().await.context("wait for container runtime")?;
        debug!("container runtime exited with {}", status);

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;
    use crate::engine::exit_code;
    use crate::error;

    fn invocation(program: &str, args: &[&str]) -> Invocation {
        Invocation {
            program: program.to_string(),
            args: args.iter().map(OsString::from).collect(),
        }
    }

    #[tokio::test]
    async fn propagates_exit_code() {
        let engine = Docker::new("sh");
        engine.check().await.unwrap();

        let status = engine
            .run(&invocation("sh", &["-c", "exit 7"]))
            .await
            .unwrap();
        assert_eq!(exit_code(status), 7);
    }

    #[tokio::test]
    async fn missing_runtime() {
        let engine = Docker::new("docker-here-no-such-runtime");
        let err = engine.check().await.unwrap_err();
        assert_eq!(error::exit_code(&err), error::EXIT_RUNTIME_UNAVAILABLE);

        let err = engine
            .run(&invocation("docker-here-no-such-runtime", &["run"]))
            .await
            .unwrap_err();
        assert_eq!(error::exit_code(&err), error::EXIT_RUNTIME_UNAVAILABLE);
    }
}
