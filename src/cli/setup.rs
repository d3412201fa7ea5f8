use std::io::{BufRead, Write};

use anyhow::{Result, bail};

use crate::config::{ConfigDocument, ConfigManager, Prompter};

use super::util::mask_api_key;

pub(crate) fn run_init(manager: &mut ConfigManager, force: bool) -> Result<()> {
    let document = init_with(manager, force, &mut Prompter::stdio())?;
    print_summary(manager, &document);
    Ok(())
}

/// Runs the prompts unless a file already exists and `force` is unset.
pub(crate) fn init_with<R: BufRead, W: Write>(
    manager: &mut ConfigManager,
    force: bool,
    prompter: &mut Prompter<R, W>,
) -> Result<ConfigDocument> {
    if manager.path().exists() && !force {
        bail!(
            "Configuration already exists at {}. Use 'agcommit init --force' to start over.",
            manager.path().display()
        );
    }

    println!("🚀 Welcome to agcommit setup!");
    println!("Press Enter to keep a default.\n");
    Ok(manager.init_interactive(prompter)?)
}

fn print_summary(manager: &ConfigManager, document: &ConfigDocument) {
    println!("\n✅ Configuration saved to {}", manager.path().display());
    println!("📋 Your configuration:");
    println!("   API Key: {}", mask_api_key(&document.openai.api_key));
    println!("   Base URL: {}", document.openai.base_url);
    println!("   Model: {}", document.openai.model);
    println!("   Language: {}", document.commit.language);
    println!("   Max Length: {}", document.commit.max_length);
    println!("   Commit Type: {}", document.commit.commit_type);
    println!("   Auto Add: {}", document.preferences.auto_add);
    println!("   Auto Commit: {}", document.preferences.auto_commit);
    println!("\n🎉 Setup complete! Stage some changes and run 'agcommit'.\n");
}
