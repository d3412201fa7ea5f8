use std::fmt;

use serde::{Deserialize, Serialize};

/// The persisted configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub version: u32,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub commit: CommitSettings,
    #[serde(default)]
    pub preferences: PreferenceSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSettings {
    pub language: String,
    pub max_length: u32,
    #[serde(rename = "type")]
    pub commit_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSettings {
    pub default_branch: String,
    pub auto_add: bool,
    pub auto_commit: bool,
}

/// A dynamically-typed leaf value moved in and out of the document by
/// dotted key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Treats blank strings as empty; ints and bools always carry a value.
    pub fn is_empty(&self) -> bool {
        matches!(self, ConfigValue::String(s) if s.trim().is_empty())
    }

    /// Parses raw text (from the command line or the environment) as a value
    /// of the given kind.
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        match kind {
            ValueKind::String => Ok(ConfigValue::String(trimmed.to_string())),
            ValueKind::Int => trimmed
                .parse::<i64>()
                .map(ConfigValue::Int)
                .map_err(|_| format!("'{trimmed}' is not a valid integer")),
            ValueKind::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(ConfigValue::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(ConfigValue::Bool(false)),
                _ => Err(format!("'{trimmed}' is not a boolean (use true or false)")),
            },
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{s}"),
            ConfigValue::Int(n) => write!(f, "{n}"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

/// Storage type of a document leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Bool,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Int => write!(f, "integer"),
            ValueKind::Bool => write!(f, "boolean"),
        }
    }
}

/// How a field is collected from the user. `Select` is stored as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Bool,
    Select,
}

impl FieldType {
    pub fn value_kind(self) -> ValueKind {
        match self {
            FieldType::String | FieldType::Select => ValueKind::String,
            FieldType::Int => ValueKind::Int,
            FieldType::Bool => ValueKind::Bool,
        }
    }
}

/// Outcome of a successful load-or-initialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub document: ConfigDocument,
    /// True when the document was collected interactively during this call.
    pub is_new: bool,
}
