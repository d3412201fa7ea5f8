use std::env;

use super::constants::ENV_PREFIX;
use super::error::ConfigError;
use super::path;
use super::schema;
use super::types::{ConfigDocument, ConfigValue};

/// Environment variable that overrides `key`, e.g. `commit.max_length` →
/// `AGCOMMIT_COMMIT_MAX_LENGTH`.
pub fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
}

/// Applies every set override to `doc` and returns the keys that changed.
/// Overrides live in memory only.
pub fn apply_env_overrides(doc: &mut ConfigDocument) -> Result<Vec<&'static str>, ConfigError> {
    let mut applied = Vec::new();
    for field in schema::fields() {
        let var = env_var_name(field.key);
        let Some(raw) = env_string(&var)? else {
            continue;
        };
        let value = ConfigValue::parse(field.field_type.value_kind(), &raw)
            .map_err(|reason| ConfigError::Environment {
                var: var.clone(),
                reason,
            })?;
        path::set(doc, field.key, value).map_err(|err| ConfigError::Environment {
            var: var.clone(),
            reason: err.to_string(),
        })?;
        applied.push(field.key);
    }
    Ok(applied)
}

pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::Environment {
            var: key.to_string(),
            reason: "contains invalid UTF-8".to_string(),
        }),
    }
}
