//! Configuration management for agcommit.
//!
//! This module provides:
//! - A static registry of typed, validated fields
//! - Dotted-key access into the configuration document
//! - Interactive first-run collection from the terminal
//! - JSON persistence with upgrades from older file layouts
//! - Environment variable overrides

mod constants;
mod defaults;
mod environment;
mod error;
mod manager;
mod migration;
mod path;
mod prompt;
mod schema;
mod store;
mod types;
mod validation;

pub use constants::{COMMIT_TYPE_CONVENTIONAL, find_language};
pub use error::{ConfigError, PathError};
pub use manager::ConfigManager;
pub use prompt::{Prompter, confirm};
pub use schema::{FieldDescriptor, lookup};
pub use types::{
    CommitSettings, ConfigDocument, ConfigValue, OpenAiSettings, PreferenceSettings,
};
