use super::constants::*;
use super::types::{CommitSettings, ConfigDocument, OpenAiSettings, PreferenceSettings};

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            openai: OpenAiSettings::default(),
            commit: CommitSettings::default(),
            preferences: PreferenceSettings::default(),
        }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl Default for CommitSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            commit_type: DEFAULT_COMMIT_TYPE.to_string(),
        }
    }
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            default_branch: DEFAULT_BRANCH.to_string(),
            auto_add: false,
            auto_commit: false,
        }
    }
}
