use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use tracing::{debug, info};

use crate::client::AiClient;
use crate::config::{ConfigManager, PreferenceSettings, Prompter, confirm};
use crate::generator::{AiCommitGenerator, CommitMessageGenerator};
use crate::git::Git;

use super::args::{Cli, Command};
use super::config_cmd;
use super::setup;

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut manager = manager_for(&cli)?;

    match cli.command {
        None | Some(Command::Commit) => run_commit(&mut manager).await,
        Some(Command::Init(args)) => setup::run_init(&mut manager, args.force),
        Some(Command::Config(command)) => config_cmd::handle_config(command, &mut manager),
    }
}

fn manager_for(cli: &Cli) -> Result<ConfigManager> {
    match &cli.config {
        Some(path) => Ok(ConfigManager::new(path)),
        None => ConfigManager::at_default_location()
            .context("Failed to locate the configuration file"),
    }
}

async fn run_commit(manager: &mut ConfigManager) -> Result<()> {
    let mut prompter = Prompter::stdio();
    let outcome = manager.load_or_init(&mut prompter)?;
    debug!(version = outcome.document.version, is_new = outcome.is_new, "configuration ready");
    if outcome.is_new {
        println!(
            "✅ Configuration saved to {}\n",
            manager.path().display()
        );
    }

    manager.apply_env_overrides()?;
    manager
        .validate()
        .context("Configuration is invalid. Fix it with 'agcommit config set' or 'agcommit init --force'")?;
    let Some(config) = manager.document().cloned() else {
        bail!("Configuration is not loaded");
    };

    let git = Git::current_dir()?;
    if !git.is_repository().await? {
        bail!(
            "{} is not inside a git repository",
            git.workdir().display()
        );
    }

    let client = AiClient::new(&config.openai)?;
    let generator = AiCommitGenerator::new(client, config.commit.clone());
    commit_staged(&git, &generator, &config.preferences, &mut prompter).await
}

/// Stages (if allowed), generates a message for the staged diff, and commits
/// it. Returns without committing when the user declines.
pub(crate) async fn commit_staged<G, R, W>(
    git: &Git,
    generator: &G,
    preferences: &PreferenceSettings,
    prompter: &mut Prompter<R, W>,
) -> Result<()>
where
    G: CommitMessageGenerator + Sync,
    R: BufRead,
    W: Write,
{
    if !git.has_staged_changes().await? {
        let stage = preferences.auto_add
            || confirm(prompter, "No staged changes. Stage all changes with 'git add .'?", false)?;
        if stage {
            info!("staging all changes");
            git.add_all().await?;
        }
        if !git.has_staged_changes().await? {
            bail!("Nothing to commit. Stage some changes first.");
        }
    }

    let diff = git.staged_diff().await?;
    debug!(bytes = diff.len(), "collected staged diff");

    println!("{}", "🤖 Generating commit message...".dimmed());
    let message = generator.generate(&diff).await?;

    println!("\n┌─ COMMIT MESSAGE");
    println!("│");
    for line in message.lines() {
        println!("│ {}", line.bold());
    }
    println!("│");
    println!("└─");

    let proceed = preferences.auto_commit || confirm(prompter, "Commit with this message?", true)?;
    if !proceed {
        println!("{}", "Commit cancelled.".yellow());
        return Ok(());
    }

    git.commit(&message).await?;
    println!("{}", "✅ Changes committed.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;

    struct FixedGenerator {
        message: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl FixedGenerator {
        fn new(message: &'static str) -> Self {
            Self {
                message,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CommitMessageGenerator for FixedGenerator {
        async fn generate(&self, diff: &str) -> Result<String> {
            self.seen.lock().unwrap().push(diff.to_string());
            Ok(self.message.to_string())
        }
    }

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn git_in(dir: &std::path::Path, args: &[&str]) -> Option<std::process::Output> {
        std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .ok()
            .filter(|output| output.status.success())
    }

    fn repo_with_file() -> Option<(TempDir, Git)> {
        let temp = TempDir::new().unwrap();
        // Skip when git is not installed.
        git_in(temp.path(), &["init", "-q"])?;
        git_in(temp.path(), &["config", "user.email", "dev@example.com"])?;
        git_in(temp.path(), &["config", "user.name", "Dev"])?;
        git_in(temp.path(), &["config", "commit.gpgsign", "false"])?;
        std::fs::write(temp.path().join("main.rs"), "fn main() {}\n").unwrap();
        let git = Git::new(temp.path());
        Some((temp, git))
    }

    fn head_subject(temp: &TempDir) -> Option<String> {
        let output = git_in(temp.path(), &["log", "-1", "--format=%s"])?;
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    #[tokio::test]
    async fn auto_add_and_auto_commit_skip_prompts() {
        let Some((temp, git)) = repo_with_file() else {
            return;
        };
        let generator = FixedGenerator::new("feat: add entry point");
        let preferences = PreferenceSettings {
            auto_add: true,
            auto_commit: true,
            ..PreferenceSettings::default()
        };

        commit_staged(&git, &generator, &preferences, &mut prompter(""))
            .await
            .unwrap();

        assert_eq!(head_subject(&temp).as_deref(), Some("feat: add entry point"));
        assert!(generator.seen.lock().unwrap()[0].contains("+fn main() {}"));
    }

    #[tokio::test]
    async fn declining_to_stage_is_an_error() {
        let Some((_temp, git)) = repo_with_file() else {
            return;
        };
        let generator = FixedGenerator::new("feat: unused");

        let err = commit_staged(
            &git,
            &generator,
            &PreferenceSettings::default(),
            &mut prompter("n\n"),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Nothing to commit"));
        assert!(generator.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn declining_the_message_leaves_changes_staged() {
        let Some((temp, git)) = repo_with_file() else {
            return;
        };
        let generator = FixedGenerator::new("feat: add entry point");

        commit_staged(
            &git,
            &generator,
            &PreferenceSettings::default(),
            &mut prompter("y\nn\n"),
        )
        .await
        .unwrap();

        assert_eq!(head_subject(&temp), None);
        assert!(git.has_staged_changes().await.unwrap());
    }
}
