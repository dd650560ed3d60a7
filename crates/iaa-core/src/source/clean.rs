//! Cleaning step implementations.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use super::Cleaner;
use crate::domain::{IaaError, Result, RunConfig};

/// Runs an external cleaning program that writes the clean dataset.
///
/// The program is invoked as
/// `<command...> --run <run> --group <group> --questions <sel> --batch <sel> [--remove-not-val]`
/// and must exit with status 0.
#[derive(Debug, Clone)]
pub struct CommandCleaner {
    command: Vec<String>,
    timeout_secs: u64,
}

impl CommandCleaner {
    /// `command` is the program followed by any fixed arguments.
    /// A `timeout_secs` of 0 disables the timeout.
    pub fn new(command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            command,
            timeout_secs,
        }
    }

    /// Full argument vector for a selection, program first.
    pub fn argv(&self, selection: &RunConfig) -> Vec<String> {
        let mut argv = self.command.clone();
        argv.extend([
            "--run".to_string(),
            selection.run.to_string(),
            "--group".to_string(),
            selection.group.clone(),
            "--questions".to_string(),
            selection.questions.to_string(),
            "--batch".to_string(),
            selection.batch.to_string(),
        ]);
        if selection.remove_not_val {
            argv.push("--remove-not-val".to_string());
        }
        argv
    }
}

#[async_trait]
impl Cleaner for CommandCleaner {
    async fn clean(&self, selection: &RunConfig) -> Result<()> {
        if self.command.is_empty() {
            return Err(IaaError::Config("clean command is empty".to_string()));
        }
        let argv = self.argv(selection);
        let (exe, args) = (&argv[0], &argv[1..]);

        let start = Instant::now();
        tracing::info!(command = %argv.join(" "), "running cleaning step");

        // A timed-out cleaner must not go on to write a partial dataset.
        let child = Command::new(exe)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| IaaError::Clean(format!("failed to start {}: {}", exe, e)))?;

        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(self.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| {
                IaaError::Clean(format!(
                    "{} timed out after {} seconds",
                    exe, self.timeout_secs
                ))
            })??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IaaError::Clean(format!(
                "{} exited with {}: {}",
                exe,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        tracing::info!(duration_ms, "cleaning step finished");
        Ok(())
    }
}

/// For datasets cleaned out-of-band: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCleaner;

#[async_trait]
impl Cleaner for NoopCleaner {
    async fn clean(&self, selection: &RunConfig) -> Result<()> {
        tracing::debug!(
            run = selection.run,
            group = %selection.group,
            "no cleaning command configured, using existing clean dataset"
        );
        Ok(())
    }
}
