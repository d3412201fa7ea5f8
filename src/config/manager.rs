use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::environment;
use super::error::{ConfigError, PathError, StoreError, ValidationError};
use super::migration::{self, LegacySource};
use super::path;
use super::prompt::Prompter;
use super::schema;
use super::store;
use super::types::{ConfigDocument, ConfigValue, LoadOutcome};
use super::validation;

/// Owns the configuration document for one program invocation.
///
/// Edits made with [`set_item`](Self::set_item) stay in memory until
/// [`save`](Self::save) is called.
#[derive(Debug)]
pub struct ConfigManager {
    path: PathBuf,
    legacy: Vec<LegacySource>,
    document: Option<ConfigDocument>,
}

impl ConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            legacy: Vec::new(),
            document: None,
        }
    }

    /// Manager for `~/.agcommit/config.json` that also imports the older
    /// files found in the home directory.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        let home = store::home()?;
        Ok(Self::new(store::default_config_path()?)
            .with_legacy_sources(migration::legacy_sources(&home)))
    }

    pub fn with_legacy_sources(mut self, sources: Vec<LegacySource>) -> Self {
        self.legacy = sources;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> Option<&ConfigDocument> {
        self.document.as_ref()
    }

    /// Loads the file without any interactive fallback.
    pub fn load(&mut self) -> Result<&ConfigDocument, ConfigError> {
        let document = store::load(&self.path)?;
        Ok(&*self.document.insert(document))
    }

    /// Loads the file, importing a legacy file or asking the user when there
    /// is nothing to load. A malformed file is returned as an error and never
    /// overwritten.
    pub fn load_or_init<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<LoadOutcome, ConfigError> {
        match store::load(&self.path) {
            Ok(document) => {
                self.document = Some(document.clone());
                return Ok(LoadOutcome {
                    document,
                    is_new: false,
                });
            }
            Err(StoreError::NotFound { .. }) => {
                debug!(path = %self.path.display(), "no configuration file");
            }
            Err(err) => return Err(err.into()),
        }

        if let Some(document) = self.import_legacy()? {
            return Ok(LoadOutcome {
                document,
                is_new: false,
            });
        }

        let document = self.init_interactive(prompter)?;
        Ok(LoadOutcome {
            document,
            is_new: true,
        })
    }

    /// Walks the full prompt sequence, saves, and holds the result.
    pub fn init_interactive<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<ConfigDocument, ConfigError> {
        info!(path = %self.path.display(), "starting interactive configuration");
        let mut document = ConfigDocument::default();
        prompter.collect_all(&mut document)?;
        store::save(&self.path, &document)?;
        self.document = Some(document.clone());
        Ok(document)
    }

    fn import_legacy(&mut self) -> Result<Option<ConfigDocument>, ConfigError> {
        for source in &self.legacy {
            if !source.path.is_file() {
                continue;
            }
            let document = match migration::import(source) {
                Ok(document) => document,
                Err(StoreError::NotFound { .. }) => continue,
                Err(err) => return Err(err.into()),
            };
            info!(
                from = %source.path.display(),
                to = %self.path.display(),
                "migrated legacy configuration"
            );
            store::save(&self.path, &document)?;
            self.document = Some(document.clone());
            return Ok(Some(document));
        }
        Ok(None)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let document = self.loaded()?;
        store::save(&self.path, document)?;
        Ok(())
    }

    /// Fails on the first required field that is empty or any field whose
    /// rule rejects its value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self.loaded()?)
    }

    pub fn get_item(&self, key: &str) -> Result<ConfigValue, ConfigError> {
        Ok(path::get(self.loaded()?, key)?)
    }

    /// Stores `value` at `key` without validating or saving.
    pub fn set_item(&mut self, key: &str, value: ConfigValue) -> Result<(), ConfigError> {
        let document = self.document.get_or_insert_with(ConfigDocument::default);
        path::set(document, key, value)?;
        Ok(())
    }

    /// Parses `raw` as the field's type, checks the field's rule, and stores
    /// it. Used by `config set`.
    pub fn set_item_from_str(&mut self, key: &str, raw: &str) -> Result<ConfigValue, ConfigError> {
        let field = schema::lookup(key).ok_or_else(|| PathError::UnknownPath {
            key: key.to_string(),
        })?;
        let value = ConfigValue::parse(field.field_type.value_kind(), raw).map_err(|reason| {
            ConfigError::Validation(ValidationError {
                key: field.key,
                reason,
            })
        })?;

        let document = self.document.get_or_insert_with(ConfigDocument::default);
        validation::validate_field(field, &value, document)?;
        path::set(document, key, value.clone())?;
        Ok(value)
    }

    /// Current value of every field in declared order.
    pub fn entries(&self) -> Result<Vec<(&'static str, ConfigValue)>, ConfigError> {
        let document = self.loaded()?;
        schema::fields()
            .iter()
            .map(|field| -> Result<_, ConfigError> {
                Ok((field.key, path::get(document, field.key)?))
            })
            .collect()
    }

    pub fn apply_env_overrides(&mut self) -> Result<Vec<&'static str>, ConfigError> {
        let document = self.document.get_or_insert_with(ConfigDocument::default);
        let applied = environment::apply_env_overrides(document)?;
        if !applied.is_empty() {
            debug!(keys = ?applied, "applied environment overrides");
        }
        Ok(applied)
    }

    /// Deletes the configuration file and forgets the held document.
    pub fn remove(&mut self) -> Result<(), ConfigError> {
        store::remove(&self.path)?;
        self.document = None;
        info!(path = %self.path.display(), "removed configuration");
        Ok(())
    }

    fn loaded(&self) -> Result<&ConfigDocument, ConfigError> {
        self.document.as_ref().ok_or_else(|| {
            StoreError::NotFound {
                path: self.path.clone(),
            }
            .into()
        })
    }
}
