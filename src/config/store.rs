use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dirs::home_dir;
use tracing::debug;

use super::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::error::{ConfigError, StoreError};
use super::migration;
use super::types::ConfigDocument;

pub fn home() -> Result<PathBuf, ConfigError> {
    home_dir().ok_or(ConfigError::HomeDirectory)
}

/// `~/.agcommit/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let mut path = home()?;
    path.push(CONFIG_DIR_NAME);
    path.push(CONFIG_FILE_NAME);
    Ok(path)
}

/// Reads and upgrades the document at `path`. A missing file is reported as
/// [`StoreError::NotFound`]; a file that exists but cannot be parsed is
/// [`StoreError::Malformed`].
pub fn load(path: &Path) -> Result<ConfigDocument, StoreError> {
    let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })?;

    let malformed = |reason: String| StoreError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let raw: serde_json::Value =
        serde_json::from_str(&contents).map_err(|err| malformed(err.to_string()))?;
    let document = migration::upgrade(raw).map_err(malformed)?;

    debug!(path = %path.display(), version = document.version, "loaded configuration");
    Ok(document)
}

/// Replaces the file at `path` with `document`. The content is written to a
/// sibling temporary file first and renamed into place.
pub fn save(path: &Path, document: &ConfigDocument) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut json = serde_json::to_string_pretty(document).map_err(|err| StoreError::Io {
        path: path.to_path_buf(),
        source: err.into(),
    })?;
    json.push('\n');

    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(io_err)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(err));
    }

    debug!(path = %path.display(), "saved configuration");
    Ok(())
}

/// Deletes the file at `path`.
pub fn remove(path: &Path) -> Result<(), StoreError> {
    fs::remove_file(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_document() -> ConfigDocument {
        let mut doc = ConfigDocument::default();
        doc.openai.api_key = "sk-test-0123456789abcdef".to_string();
        doc.openai.model = "gpt-4".to_string();
        doc.commit.language = "zh".to_string();
        doc.commit.max_length = 0;
        doc.preferences.default_branch = String::new();
        doc.preferences.auto_commit = true;
        doc
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/config.json");

        let doc = sample_document();
        save(&path, &doc).unwrap();
        assert_eq!(load(&path).unwrap(), doc);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn saved_file_is_indented_json_with_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        save(&path, &sample_document()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"version\": 2"));
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["openai"]["api_key"], "sk-test-0123456789abcdef");
        assert_eq!(json["commit"]["type"], "conventional");
        assert_eq!(json["preferences"]["auto_commit"], true);
    }

    #[test]
    fn save_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        save(&path, &sample_document()).unwrap();

        let mut updated = sample_document();
        updated.commit.max_length = 300;
        save(&path, &updated).unwrap();
        assert_eq!(load(&path).unwrap().commit.max_length, 300);
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ \"version\": 2, \"openai\": ").unwrap();
        assert!(matches!(load(&path).unwrap_err(), StoreError::Malformed { .. }));
    }

    #[test]
    fn empty_file_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "").unwrap();
        assert!(matches!(load(&path).unwrap_err(), StoreError::Malformed { .. }));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"version": 2, "commit": {"max_length": "long"}}"#,
        )
        .unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn flat_json_is_upgraded_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"version": "1.0.0", "openai_key": "sk-flat-0123456789abcdef", "max_length": 60}"#,
        )
        .unwrap();
        let doc = load(&path).unwrap();
        assert_eq!(doc.openai.api_key, "sk-flat-0123456789abcdef");
        assert_eq!(doc.commit.max_length, 60);
    }

    #[test]
    fn unversioned_nested_json_keeps_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"openai":{"api_key":"sk-nested-0123456789abcdef","model":"gpt-4"},"commit":{"max_length":300}}"#,
        )
        .unwrap();
        let doc = load(&path).unwrap();
        assert_eq!(doc.openai.api_key, "sk-nested-0123456789abcdef");
        assert_eq!(doc.openai.model, "gpt-4");
        assert_eq!(doc.commit.max_length, 300);
    }

    #[test]
    fn unrecognized_json_object_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        for contents in [
            r#"{"api":{"key":"sk-nested-0123456789abcdef"},"length":300}"#,
            r#"{"Version":"1.0.0","OpenAI":{"Token":"sk-nested-0123456789abcdef"}}"#,
        ] {
            fs::write(&path, contents).unwrap();
            assert!(
                matches!(load(&path).unwrap_err(), StoreError::Malformed { .. }),
                "{contents}"
            );
            assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        }
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load(temp.path()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn remove_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        assert!(remove(&path).unwrap_err().is_not_found());
        save(&path, &sample_document()).unwrap();
        remove(&path).unwrap();
        assert!(!path.exists());
    }
}
