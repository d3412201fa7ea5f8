//! Upgrading older on-disk layouts to the current document.
//!
//! Layouts found in the wild:
//!
//! 1. `~/.agcommits` and `~/.agcommitsrc`: `KEY=value` lines.
//! 2. `~/.agcommitsrc.yaml`: flat YAML using snake_case keys.
//! 3. `~/.agcommits/config.json`: nested JSON without an integer version,
//!    with group and field names in whatever case the writer used
//!    (`"OpenAI": {"Api_key": ..}`).
//! 4. `~/.agcommit/config.json`: the current nested JSON document.
//!
//! Layouts 1 and 2 are normalized into the flat "version 1" JSON shape and
//! layout 3 into the current shape. Versioned documents are then upgraded
//! step by step until they reach [`CURRENT_VERSION`]. A JSON object that
//! matches none of these is rejected rather than read as defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::constants::{
    COMMIT_TYPE_DEFAULT, CURRENT_VERSION, LEGACY_JSON_DIR, LEGACY_JSON_FILE,
    LEGACY_KEY_VALUE_FILE, LEGACY_RC_FILE, LEGACY_YAML_FILE,
};
use super::error::StoreError;
use super::schema;
use super::types::ConfigDocument;

/// Keys of the flat version 1 layout.
const FLAT_KEYS: &[&str] = &[
    "openai_key",
    "openai_api_base",
    "openai_model",
    "commit_locale",
    "max_length",
    "commit_type",
    "auto_add",
    "auto_commit",
];

/// Top-level groups of the nested layouts.
const GROUPS: &[&str] = &["openai", "commit", "preferences"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyFormat {
    KeyValue,
    Yaml,
    Json,
}

/// Shape of a parsed JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Integer `version` field.
    Versioned(u32),
    /// Flat snake_case keys such as `openai_key`; upgraded as version 1.
    Flat,
    /// Nested groups without an integer version.
    Unversioned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySource {
    pub path: PathBuf,
    pub format: LegacyFormat,
}

impl LegacySource {
    pub fn new(path: impl Into<PathBuf>, format: LegacyFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

/// Legacy files the program used to write under `home`, newest first.
pub fn legacy_sources(home: &Path) -> Vec<LegacySource> {
    vec![
        LegacySource::new(
            home.join(LEGACY_JSON_DIR).join(LEGACY_JSON_FILE),
            LegacyFormat::Json,
        ),
        LegacySource::new(home.join(LEGACY_YAML_FILE), LegacyFormat::Yaml),
        LegacySource::new(home.join(LEGACY_RC_FILE), LegacyFormat::KeyValue),
        LegacySource::new(home.join(LEGACY_KEY_VALUE_FILE), LegacyFormat::KeyValue),
    ]
}

/// Classifies a parsed JSON document. Objects that carry neither an integer
/// version, a known flat key, nor a known group are an error.
pub fn detect_layout(value: &Value) -> Result<Layout, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "expected a JSON object at the top level".to_string())?;

    if let Some(Value::Number(n)) = object.get("version") {
        return n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v >= 1)
            .map(Layout::Versioned)
            .ok_or_else(|| format!("invalid version {n}"));
    }

    let has_group = object
        .iter()
        .any(|(key, value)| value.is_object() && GROUPS.contains(&key.to_lowercase().as_str()));
    if has_group {
        return Ok(Layout::Unversioned);
    }

    let only_version = object.keys().all(|key| key.eq_ignore_ascii_case("version"));
    if only_version || object.keys().any(|key| FLAT_KEYS.contains(&key.as_str())) {
        return Ok(Layout::Flat);
    }

    Err("no recognized configuration keys".to_string())
}

/// Brings a parsed document up to the current schema.
pub fn upgrade(value: Value) -> Result<ConfigDocument, String> {
    let (mut value, mut version) = match detect_layout(&value)? {
        Layout::Versioned(version) => (value, version),
        Layout::Flat => (value, 1),
        Layout::Unversioned => (normalize_nested(value)?, CURRENT_VERSION),
    };

    if version > CURRENT_VERSION {
        return Err(format!(
            "version {version} was written by a newer release (this build reads up to {CURRENT_VERSION})"
        ));
    }

    while version < CURRENT_VERSION {
        value = match version {
            1 => upgrade_flat(value)?,
            other => return Err(format!("no upgrade path from version {other}")),
        };
        version += 1;
        debug!(version, "upgraded configuration document");
    }

    serde_json::from_value(value).map_err(|err| err.to_string())
}

/// Lower-cases group and field names and stamps the current version.
/// Unknown entries are dropped with a warning; a document with no known
/// field at all is an error.
fn normalize_nested(value: Value) -> Result<Value, String> {
    let Value::Object(object) = value else {
        return Err("expected a JSON object at the top level".to_string());
    };

    let mut out = Map::new();
    let mut known = 0;
    for (name, group) in object {
        let group_name = name.to_lowercase();
        if group_name == "version" {
            continue;
        }
        if !GROUPS.contains(&group_name.as_str()) {
            warn!(key = %name, "ignoring unknown configuration group");
            continue;
        }
        let Value::Object(fields) = group else {
            return Err(format!("'{name}' must be an object"));
        };

        let mut normalized = Map::new();
        for (field, value) in fields {
            let field_name = field.to_lowercase();
            let key = format!("{group_name}.{field_name}");
            if schema::lookup(&key).is_none() {
                warn!(key = %key, "ignoring unknown configuration key");
                continue;
            }
            known += 1;
            normalized.insert(field_name, value);
        }
        out.insert(group_name, Value::Object(normalized));
    }

    if known == 0 {
        return Err("no recognized configuration keys".to_string());
    }
    out.insert("version".into(), json!(CURRENT_VERSION));
    Ok(Value::Object(out))
}

/// Version 1 → 2: flat keys become nested groups.
fn upgrade_flat(value: Value) -> Result<Value, String> {
    let Value::Object(flat) = value else {
        return Err("expected a JSON object at the top level".to_string());
    };

    for key in flat.keys() {
        if key != "version" && !FLAT_KEYS.contains(&key.as_str()) {
            warn!(key = %key, "ignoring unknown legacy configuration key");
        }
    }

    let mut openai = Map::new();
    let mut commit = Map::new();
    let mut preferences = Map::new();

    copy_string(&flat, "openai_key", &mut openai, "api_key");
    copy_string(&flat, "openai_api_base", &mut openai, "base_url");
    copy_string(&flat, "openai_model", &mut openai, "model");
    copy_string(&flat, "commit_locale", &mut commit, "language");

    match flat.get("max_length") {
        Some(Value::Number(n)) if n.as_u64().is_some() => {
            commit.insert("max_length".into(), Value::Number(n.clone()));
        }
        Some(Value::String(s)) => match s.trim().parse::<u32>() {
            Ok(n) => {
                commit.insert("max_length".into(), json!(n));
            }
            Err(_) => warn!(value = %s, "ignoring unparseable legacy max_length"),
        },
        Some(other) => warn!(value = %other, "ignoring unparseable legacy max_length"),
        None => {}
    }

    // An empty commit type meant "no particular style".
    match flat.get("commit_type").and_then(Value::as_str) {
        Some("") => {
            commit.insert("type".into(), json!(COMMIT_TYPE_DEFAULT));
        }
        Some(kind) => {
            commit.insert("type".into(), json!(kind));
        }
        None => {}
    }

    copy_bool(&flat, "auto_add", &mut preferences, "auto_add");
    copy_bool(&flat, "auto_commit", &mut preferences, "auto_commit");

    Ok(json!({
        "version": 2,
        "openai": openai,
        "commit": commit,
        "preferences": preferences,
    }))
}

/// Empty strings are dropped so the current default applies.
fn copy_string(from: &Map<String, Value>, key: &str, to: &mut Map<String, Value>, target: &str) {
    match from.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => {
            to.insert(target.into(), json!(s.trim()));
        }
        Some(Value::String(_)) | Some(Value::Null) | None => {}
        Some(other) => {
            to.insert(target.into(), json!(other.to_string()));
        }
    }
}

fn copy_bool(from: &Map<String, Value>, key: &str, to: &mut Map<String, Value>, target: &str) {
    match from.get(key) {
        Some(Value::Bool(b)) => {
            to.insert(target.into(), json!(b));
        }
        Some(Value::String(s)) => match s.trim() {
            "true" => {
                to.insert(target.into(), json!(true));
            }
            "false" => {
                to.insert(target.into(), json!(false));
            }
            other => warn!(key, value = %other, "ignoring unparseable legacy boolean"),
        },
        Some(other) => warn!(key, value = %other, "ignoring unparseable legacy boolean"),
        None => {}
    }
}

/// Reads a legacy file and upgrades it.
pub fn import(source: &LegacySource) -> Result<ConfigDocument, StoreError> {
    let contents = match fs::read_to_string(&source.path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                path: source.path.clone(),
            });
        }
        Err(source_err) => {
            return Err(StoreError::Io {
                path: source.path.clone(),
                source: source_err,
            });
        }
    };

    let malformed = |reason: String| StoreError::Malformed {
        path: source.path.clone(),
        reason,
    };

    let flat = match source.format {
        LegacyFormat::KeyValue => parse_key_value(&contents).map_err(malformed)?,
        LegacyFormat::Yaml => parse_flat_yaml(&contents).map_err(malformed)?,
        LegacyFormat::Json => {
            serde_json::from_str(&contents).map_err(|err| malformed(err.to_string()))?
        }
    };

    upgrade(flat).map_err(malformed)
}

fn key_value_target(key: &str) -> Option<&'static str> {
    match key {
        "OPENAI_KEY" => Some("openai_key"),
        "OPENAI_API_BASE" => Some("openai_api_base"),
        "OPENAI_MODEL" => Some("openai_model"),
        "COMMIT_LOCALE" => Some("commit_locale"),
        "MAX_LENGTH" => Some("max_length"),
        "COMMIT_TYPE" => Some("commit_type"),
        _ => None,
    }
}

/// Parses `KEY=value` lines into the flat version 1 shape.
pub fn parse_key_value(contents: &str) -> Result<Value, String> {
    let mut flat = Map::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!("line {} is not KEY=value: {line}", index + 1))?;
        let key = key.trim();
        match key_value_target(key) {
            Some(target) => {
                flat.insert(target.to_string(), json!(value.trim()));
            }
            None => warn!(key, "ignoring unknown legacy configuration key"),
        }
    }
    flat.insert("version".into(), json!(1));
    Ok(Value::Object(flat))
}

/// Parses the flat YAML layout into the version 1 shape.
pub fn parse_flat_yaml(contents: &str) -> Result<Value, String> {
    let value: Value = serde_yaml::from_str(contents).map_err(|err| err.to_string())?;
    let Value::Object(mut flat) = value else {
        return Err("expected a mapping at the top level".to_string());
    };
    if !flat.keys().any(|key| FLAT_KEYS.contains(&key.as_str())) {
        return Err("no recognized configuration keys".to_string());
    }
    flat.insert("version".into(), json!(1));
    Ok(Value::Object(flat))
}
