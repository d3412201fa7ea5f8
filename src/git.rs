//! Thin wrappers around the `git` binary.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Result, anyhow, bail};
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Git invocations rooted at one working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub async fn is_repository(&self) -> Result<bool> {
        let output = self.output(&["rev-parse", "--is-inside-work-tree"]).await?;
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    pub async fn has_staged_changes(&self) -> Result<bool> {
        let output = self
            .output(&["diff", "--cached", "--quiet", "--exit-code"])
            .await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure("diff --cached", &output)),
        }
    }

    pub async fn staged_diff(&self) -> Result<String> {
        let output = self.checked(&["diff", "--cached", "--no-color"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub async fn add_all(&self) -> Result<()> {
        self.checked(&["add", "."]).await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            bail!("Refusing to commit with an empty message");
        }
        self.checked(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.output(args).await?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(failure(&args.join(" "), &output))
        }
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(workdir = %self.workdir.display(), ?args, "running git");
        TokioCommand::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    anyhow!("git not found. Please ensure git is installed and in your PATH.")
                } else {
                    anyhow!("Failed to run 'git {}': {}", args.join(" "), e)
                }
            })
    }
}

fn failure(command: &str, output: &Output) -> anyhow::Error {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow!(
        "'git {}' failed with exit code {:?}: {}",
        command,
        output.status.code(),
        stderr.trim()
    )
}
