use crate::config::{ConfigValue, FieldDescriptor};

pub(crate) fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }

    let visible = key.chars().count().min(8);
    let prefix: String = key.chars().take(visible).collect();
    format!("{prefix}***")
}

/// Renders a value for terminal output, hiding secrets unless asked not to.
pub(crate) fn display_value(
    field: &FieldDescriptor,
    value: &ConfigValue,
    show_secrets: bool,
) -> String {
    match value {
        ConfigValue::String(raw) if field.is_secret() && !show_secrets => mask_api_key(raw),
        ConfigValue::String(raw) if raw.is_empty() => "(not set)".to_string(),
        other => other.to_string(),
    }
}
