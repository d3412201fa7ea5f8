pub const CURRENT_VERSION: u32 = 2;

pub const CONFIG_DIR_NAME: &str = ".agcommit";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LEGACY_KEY_VALUE_FILE: &str = ".agcommits";
pub const LEGACY_RC_FILE: &str = ".agcommitsrc";
pub const LEGACY_YAML_FILE: &str = ".agcommitsrc.yaml";
/// `~/.agcommits/config.json`, nested JSON stamped `"Version": "1.0.0"`.
pub const LEGACY_JSON_DIR: &str = ".agcommits";
pub const LEGACY_JSON_FILE: &str = "config.json";

pub const ENV_PREFIX: &str = "AGCOMMIT_";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_MAX_LENGTH: u32 = 150;
pub const DEFAULT_COMMIT_TYPE: &str = "conventional";
pub const DEFAULT_BRANCH: &str = "main";

pub const MIN_API_KEY_LENGTH: usize = 20;
pub const MIN_MAX_LENGTH: i64 = 20;
pub const MAX_MAX_LENGTH: i64 = 500;

pub const COMMIT_TYPE_CONVENTIONAL: &str = "conventional";
pub const COMMIT_TYPE_DEFAULT: &str = "default";

/// A supported commit message language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    /// English name handed to the model.
    pub prompt_name: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", prompt_name: "English" },
    Language { code: "zh", prompt_name: "Chinese" },
    Language { code: "es", prompt_name: "Spanish" },
    Language { code: "hi", prompt_name: "Hindi" },
    Language { code: "ar", prompt_name: "Arabic" },
    Language { code: "fr", prompt_name: "French" },
    Language { code: "de", prompt_name: "German" },
    Language { code: "pt", prompt_name: "Portuguese" },
    Language { code: "ja", prompt_name: "Japanese" },
    Language { code: "ko", prompt_name: "Korean" },
    Language { code: "ru", prompt_name: "Russian" },
];

pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|lang| lang.code == code)
}
