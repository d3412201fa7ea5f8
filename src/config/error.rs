//! Error taxonomy for the configuration subsystem.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::types::ValueKind;

/// Top-level error returned by the configuration manager.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A dotted key did not resolve, or the value had the wrong type
    #[error(transparent)]
    Path(#[from] PathError),

    /// A field holds a value its rule rejects
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A required field has no value
    #[error("required field '{key}' is not set")]
    MissingRequired { key: &'static str },

    /// The interactive sequence stopped on an unrecoverable read error
    #[error("configuration of '{key}' aborted: {source}")]
    PromptAborted {
        key: &'static str,
        #[source]
        source: PromptError,
    },

    /// An environment override could not be applied
    #[error("environment variable {var}: {reason}")]
    Environment { var: String, reason: String },

    /// The user's home directory could not be determined
    #[error("could not determine home directory")]
    HomeDirectory,
}

/// Persistence failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file does not exist; triggers interactive initialization
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be deserialized
    #[error("configuration file {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Any other filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Failures of the path resolver. These indicate a programming error when
/// the key comes from the schema registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("unknown configuration key '{key}'")]
    UnknownPath { key: String },

    #[error("configuration key '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("value {value} is out of range for '{key}'")]
    OutOfRange { key: String, value: i64 },
}

/// A field's rule rejected a value. The reason is displayed verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for '{key}': {reason}")]
pub struct ValidationError {
    pub key: &'static str,
    pub reason: String,
}

/// Unrecoverable terminal failures during prompting.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("unexpected end of input")]
    EndOfInput,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
