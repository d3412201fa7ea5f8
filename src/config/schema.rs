//! Static registry of configuration fields.
//!
//! The slice order is the order in which fields are prompted, listed, and
//! validated: credentials first, then endpoint and model, then commit
//! message settings, then repository preferences.

use super::constants::*;
use super::types::{ConfigDocument, ConfigValue, FieldType};
use super::validation;

/// A field rule. Receives the candidate value plus a read-only view of the
/// document for rules that need cross-field context.
pub type Validator = fn(&ConfigValue, &ConfigDocument) -> Result<(), String>;

/// Default of an optional field, in a form that can live in a static.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> ConfigValue {
        match self {
            DefaultValue::Str(s) => ConfigValue::String(s.to_string()),
            DefaultValue::Int(n) => ConfigValue::Int(n),
            DefaultValue::Bool(b) => ConfigValue::Bool(b),
        }
    }
}

/// One entry of a select menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub options: &'static [SelectOption],
    pub validate: Option<Validator>,
    pub prompt: &'static str,
    pub help: &'static str,
}

impl FieldDescriptor {
    pub fn default_value(&self) -> Option<ConfigValue> {
        self.default.map(DefaultValue::to_value)
    }

    pub fn is_secret(&self) -> bool {
        self.key == "openai.api_key"
    }
}

const MODEL_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "gpt-3.5-turbo", label: "gpt-3.5-turbo" },
    SelectOption { value: "gpt-4", label: "gpt-4" },
    SelectOption { value: "gpt-4-turbo-preview", label: "gpt-4-turbo-preview" },
    SelectOption { value: "gpt-4o-mini", label: "gpt-4o-mini" },
];

const LANGUAGE_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "en", label: "en (English)" },
    SelectOption { value: "zh", label: "zh (中文)" },
    SelectOption { value: "es", label: "es (Español)" },
    SelectOption { value: "hi", label: "hi (हिन्दी)" },
    SelectOption { value: "ar", label: "ar (العربية)" },
    SelectOption { value: "fr", label: "fr (Français)" },
    SelectOption { value: "de", label: "de (Deutsch)" },
    SelectOption { value: "pt", label: "pt (Português)" },
    SelectOption { value: "ja", label: "ja (日本語)" },
    SelectOption { value: "ko", label: "ko (한국어)" },
    SelectOption { value: "ru", label: "ru (Русский)" },
];

const COMMIT_TYPE_OPTIONS: &[SelectOption] = &[
    SelectOption {
        value: COMMIT_TYPE_CONVENTIONAL,
        label: "conventional (<type>(<scope>): <message>)",
    },
    SelectOption { value: COMMIT_TYPE_DEFAULT, label: "default (free-form message)" },
];

static FIELDS: [FieldDescriptor; 9] = [
    FieldDescriptor {
        key: "openai.api_key",
        field_type: FieldType::String,
        required: true,
        default: None,
        options: &[],
        validate: Some(validation::api_key),
        prompt: "Enter your OpenAI API key",
        help: "Key used to authenticate against the chat completion API",
    },
    FieldDescriptor {
        key: "openai.base_url",
        field_type: FieldType::String,
        required: false,
        default: Some(DefaultValue::Str(DEFAULT_OPENAI_BASE_URL)),
        options: &[],
        validate: Some(validation::http_url),
        prompt: "Enter the API base URL (blank keeps the default)",
        help: "Base URL of an OpenAI-compatible API",
    },
    FieldDescriptor {
        key: "openai.model",
        field_type: FieldType::Select,
        required: false,
        default: Some(DefaultValue::Str(DEFAULT_OPENAI_MODEL)),
        options: MODEL_OPTIONS,
        validate: Some(validation::non_empty),
        prompt: "Select the model",
        help: "Model used to generate commit messages",
    },
    FieldDescriptor {
        key: "commit.language",
        field_type: FieldType::Select,
        required: false,
        default: Some(DefaultValue::Str(DEFAULT_LANGUAGE)),
        options: LANGUAGE_OPTIONS,
        validate: Some(validation::language),
        prompt: "Select the commit message language",
        help: "Language the commit message is written in",
    },
    FieldDescriptor {
        key: "commit.max_length",
        field_type: FieldType::Int,
        required: false,
        default: Some(DefaultValue::Int(DEFAULT_MAX_LENGTH as i64)),
        options: &[],
        validate: Some(validation::max_length),
        prompt: "Enter the maximum commit message length (blank keeps the default)",
        help: "Upper bound on generated message length, in characters",
    },
    FieldDescriptor {
        key: "commit.type",
        field_type: FieldType::Select,
        required: false,
        default: Some(DefaultValue::Str(DEFAULT_COMMIT_TYPE)),
        options: COMMIT_TYPE_OPTIONS,
        validate: Some(validation::commit_type),
        prompt: "Select the commit message style",
        help: "Commit message style",
    },
    FieldDescriptor {
        key: "preferences.default_branch",
        field_type: FieldType::String,
        required: false,
        default: Some(DefaultValue::Str(DEFAULT_BRANCH)),
        options: &[],
        validate: Some(validation::branch_name),
        prompt: "Enter the default branch name (blank keeps the default)",
        help: "Default git branch",
    },
    FieldDescriptor {
        key: "preferences.auto_add",
        field_type: FieldType::Bool,
        required: false,
        default: Some(DefaultValue::Bool(false)),
        options: &[],
        validate: None,
        prompt: "Run `git add .` automatically when nothing is staged?",
        help: "Stage all changes without asking",
    },
    FieldDescriptor {
        key: "preferences.auto_commit",
        field_type: FieldType::Bool,
        required: false,
        default: Some(DefaultValue::Bool(false)),
        options: &[],
        validate: None,
        prompt: "Commit automatically with the generated message?",
        help: "Commit without asking for confirmation",
    },
];

/// All fields, in declared order.
pub fn fields() -> &'static [FieldDescriptor] {
    &FIELDS
}

pub fn lookup(key: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|field| field.key == key)
}

#[cfg(test)]
pub fn ordered_keys() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|field| field.key)
}
