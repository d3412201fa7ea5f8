use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::commands;

/// Entry point for the `agcommit` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "agcommit",
    about = "Generate git commit messages from staged changes",
    version,
    propagate_version = true,
    long_about = None
)]
pub struct Cli {
    /// Subcommand to run (defaults to `commit`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the configuration file (default: ~/.agcommit/config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a message for the staged changes and commit them.
    Commit,

    /// Walk through the configuration prompts and save the result.
    Init(InitArgs),

    /// Read or change individual settings.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Re-run the prompts even if a configuration file already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the value stored at a dotted key, e.g. `commit.max_length`.
    Get {
        key: String,

        /// Print the API key in full.
        #[arg(long)]
        show_secrets: bool,
    },

    /// Validate and store a value at a dotted key.
    Set { key: String, value: String },

    /// Print every setting in declared order.
    List {
        /// Print the API key in full.
        #[arg(long)]
        show_secrets: bool,
    },

    /// Print the configuration file location.
    Path,

    /// Load the configuration, apply environment overrides, and validate it.
    Check,

    /// Delete the configuration file.
    Remove {
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

impl Cli {
    /// Filter directive derived from `-q` and the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        }
    }

    pub async fn run(self) -> Result<()> {
        commands::run(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_commit() {
        let cli = Cli::try_parse_from(["agcommit"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn verbosity_flags_map_to_levels() {
        let cli = Cli::try_parse_from(["agcommit", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), "debug");
        let cli = Cli::try_parse_from(["agcommit", "-q", "-v"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn config_set_takes_key_and_value() {
        let cli = Cli::try_parse_from([
            "agcommit",
            "config",
            "set",
            "commit.max_length",
            "300",
            "--config",
            "/tmp/agcommit.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/agcommit.json")));
        match cli.command {
            Some(Command::Config(ConfigCommand::Set { key, value })) => {
                assert_eq!(key, "commit.max_length");
                assert_eq!(value, "300");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn init_accepts_force() {
        let cli = Cli::try_parse_from(["agcommit", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Init(InitArgs { force: true }))
        ));
    }
}
