use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::tools::ToolCommand;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// An external tool ran but exited unsuccessfully.
#[derive(Debug, Error)]
#[error("`{command}` failed with {}{}", status_text(.code), stderr_suffix(.stderr))]
pub struct ToolFailure {
    pub command: String,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolFailure {
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(0) | None => 1,
            Some(code) => code,
        }
    }
}

fn status_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

#[async_trait]
pub trait Executor: Send + Sync {
    /// Runs the command with piped output and returns what it printed.
    async fn capture(&self, command: &ToolCommand) -> Result<CommandOutput>;

    /// Runs the command attached to the terminal until it exits.
    async fn attach(&self, command: &ToolCommand) -> Result<()>;
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    fn command(command: &ToolCommand) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).kill_on_drop(true);
        cmd
    }

    fn check(command: &ToolCommand, status: ExitStatus, stderr: &str) -> Result<()> {
        if status.success() {
            return Ok(());
        }
        Err(ToolFailure {
            command: command.to_string(),
            code: status.code(),
            stderr: stderr.trim().to_string(),
        }
        .into())
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn capture(&self, command: &ToolCommand) -> Result<CommandOutput> {
        log::info!("running {}", command);
        let output = Self::command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("failed to run `{}`", command.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        log::debug!("stdout:{}", stdout);
        log::debug!("stderr:{}", stderr);

        Self::check(command, output.status, &stderr)?;
        Ok(CommandOutput { stdout, stderr })
    }

    async fn attach(&self, command: &ToolCommand) -> Result<()> {
        log::info!("running {}", command);
        let status = Self::command(command)
            .status()
            .await
            .with_context(|| format!("failed to run `{}`", command.program))?;
        Self::check(command, status, "")
    }
}
