use super::constants::{
    COMMIT_TYPE_CONVENTIONAL, COMMIT_TYPE_DEFAULT, MAX_MAX_LENGTH, MIN_API_KEY_LENGTH,
    MIN_MAX_LENGTH, find_language,
};
use super::error::{ConfigError, ValidationError};
use super::path;
use super::schema::{self, FieldDescriptor};
use super::types::{ConfigDocument, ConfigValue};

/// Runs the field's own rule against a candidate value.
pub fn validate_field(
    field: &FieldDescriptor,
    value: &ConfigValue,
    doc: &ConfigDocument,
) -> Result<(), ValidationError> {
    if field.required && value.is_empty() {
        return Err(ValidationError {
            key: field.key,
            reason: "a value is required".to_string(),
        });
    }

    match field.validate {
        Some(rule) => rule(value, doc).map_err(|reason| ValidationError {
            key: field.key,
            reason,
        }),
        None => Ok(()),
    }
}

/// Checks the whole document in declared field order and stops at the first
/// problem.
pub fn validate(doc: &ConfigDocument) -> Result<(), ConfigError> {
    for field in schema::fields() {
        let value = path::get(doc, field.key)?;
        if field.required && value.is_empty() {
            return Err(ConfigError::MissingRequired { key: field.key });
        }
        validate_field(field, &value, doc)?;
    }
    Ok(())
}

fn expect_str(value: &ConfigValue) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected text, got {}", value.kind()))
}

pub(super) fn api_key(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    let key = expect_str(value)?;
    if key.chars().any(char::is_whitespace) {
        return Err("API key must not contain whitespace".to_string());
    }
    if key.len() < MIN_API_KEY_LENGTH {
        return Err(format!(
            "API key looks too short (expected at least {MIN_API_KEY_LENGTH} characters)"
        ));
    }
    Ok(())
}

pub(super) fn http_url(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    let url = expect_str(value)?;
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err("URL must start with http:// or https://".to_string())
    }
}

pub(super) fn non_empty(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    if expect_str(value)?.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(())
    }
}

pub(super) fn language(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    let code = expect_str(value)?;
    match find_language(code) {
        Some(_) => Ok(()),
        None => Err(format!("unsupported language '{code}'")),
    }
}

pub(super) fn max_length(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    let length = value
        .as_int()
        .ok_or_else(|| format!("expected an integer, got {}", value.kind()))?;
    if (MIN_MAX_LENGTH..=MAX_MAX_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(format!(
            "length must be between {MIN_MAX_LENGTH} and {MAX_MAX_LENGTH}, got {length}"
        ))
    }
}

pub(super) fn commit_type(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    match expect_str(value)? {
        COMMIT_TYPE_CONVENTIONAL | COMMIT_TYPE_DEFAULT => Ok(()),
        other => Err(format!(
            "commit type must be '{COMMIT_TYPE_CONVENTIONAL}' or '{COMMIT_TYPE_DEFAULT}', got '{other}'"
        )),
    }
}

pub(super) fn branch_name(value: &ConfigValue, _doc: &ConfigDocument) -> Result<(), String> {
    let branch = expect_str(value)?;
    if branch.is_empty() {
        Err("branch name must not be empty".to_string())
    } else if branch.chars().any(char::is_whitespace) {
        Err("branch name must not contain whitespace".to_string())
    } else {
        Ok(())
    }
}
