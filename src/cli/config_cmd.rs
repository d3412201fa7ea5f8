use anyhow::{Context, Result, anyhow};
use colored::Colorize;

use crate::config::{
    ConfigError, ConfigManager, ConfigValue, PathError, Prompter, confirm, lookup,
};

use super::args::ConfigCommand;
use super::util::display_value;

pub(crate) fn handle_config(command: ConfigCommand, manager: &mut ConfigManager) -> Result<()> {
    match command {
        ConfigCommand::Get { key, show_secrets } => {
            manager.load()?;
            let field = lookup(&key).ok_or_else(|| unknown_key(&key))?;
            let value = manager.get_item(&key)?;
            println!("{}", display_value(field, &value, show_secrets));
        }
        ConfigCommand::Set { key, value } => {
            let stored = set_value(manager, &key, &value)?;
            println!(
                "✅ {} = {}",
                key,
                lookup(&key)
                    .map(|field| display_value(field, &stored, false))
                    .unwrap_or_else(|| stored.to_string())
            );
        }
        ConfigCommand::List { show_secrets } => {
            manager.load()?;
            println!("📋 {}", manager.path().display());
            for (key, value) in manager.entries()? {
                let shown = lookup(key)
                    .map(|field| display_value(field, &value, show_secrets))
                    .unwrap_or_else(|| value.to_string());
                println!("   {} = {}", key.cyan(), shown);
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.path().display());
        }
        ConfigCommand::Check => {
            manager.load()?;
            let overridden = manager.apply_env_overrides()?;
            manager.validate()?;
            println!("✅ Configuration at {} is valid", manager.path().display());
            if !overridden.is_empty() {
                println!("   Environment overrides: {}", overridden.join(", "));
            }
        }
        ConfigCommand::Remove { yes } => {
            let question = format!("Delete {}?", manager.path().display());
            if !yes && !confirm(&mut Prompter::stdio(), &question, false)? {
                println!("{}", "Nothing removed.".yellow());
                return Ok(());
            }
            manager.remove()?;
            println!("🗑️  Removed {}", manager.path().display());
        }
    }

    Ok(())
}

/// Loads the existing file when there is one, then parses, validates,
/// stores, and saves a single value.
pub(crate) fn set_value(
    manager: &mut ConfigManager,
    key: &str,
    raw: &str,
) -> Result<ConfigValue> {
    match manager.load() {
        Ok(_) => {}
        Err(ConfigError::Store(err)) if err.is_not_found() => {}
        Err(err) => return Err(err.into()),
    }

    let value = manager.set_item_from_str(key, raw)?;
    manager
        .save()
        .with_context(|| format!("Failed to save {}", manager.path().display()))?;
    Ok(value)
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(ConfigError::from(PathError::UnknownPath {
        key: key.to_string(),
    }))
}
