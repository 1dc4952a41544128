//! Settings structs and loading logic.
//!
//! Priority (highest to lowest):
//! 1. Environment variables
//! 2. Head of the saved settings history
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::ProviderId;

use super::history::ConfigStore;

/// Errors while loading, editing or persisting settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read settings history {path}: {source}")]
    ReadHistory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings history {path}: {source}")]
    ParseHistory {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write settings history {path}: {source}")]
    WriteHistory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(String),

    #[error(
        "unknown settings key '{0}'. Known keys: gemini.api_key, gemini.model, ollama.url, \
         ollama.model, lmstudio.url, lmstudio.model, upload.allowed_extensions, \
         upload.ignored_dirs, upload.ignored_files"
    )]
    UnknownKey(String),

    #[error("no history entry #{index} (history has {len} entries)")]
    HistoryIndex { index: usize, len: usize },

    #[error("could not determine the settings directory")]
    NoConfigDir,
}

/// Everything the user can save from the settings screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub providers: ProviderConfig,
    pub upload: UploadFilterRules,
}

/// Per-provider connection settings.
///
/// Values are opaque strings: nothing is validated here beyond the
/// non-emptiness checks each adapter performs at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub gemini: CloudSettings,
    pub ollama: LocalEndpoint,
    pub lmstudio: LocalEndpoint,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            gemini: CloudSettings::default(),
            ollama: LocalEndpoint::new(constants::DEFAULT_OLLAMA_URL, constants::DEFAULT_OLLAMA_MODEL),
            lmstudio: LocalEndpoint::new(
                constants::DEFAULT_LMSTUDIO_URL,
                constants::DEFAULT_LMSTUDIO_MODEL,
            ),
        }
    }
}

impl ProviderConfig {
    /// The slice of settings a single provider's adapter receives.
    pub fn settings_for(&self, provider: ProviderId) -> BackendSettings {
        match provider {
            ProviderId::Gemini => BackendSettings::Cloud(self.gemini.clone()),
            ProviderId::Ollama => BackendSettings::Local(self.ollama.clone()),
            ProviderId::LmStudio => BackendSettings::Local(self.lmstudio.clone()),
        }
    }
}

/// Cloud provider settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    pub api_key: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for CloudSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .finish()
    }
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: constants::DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl CloudSettings {
    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// A local OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalEndpoint {
    pub url: String,
    pub model: String,
}

impl LocalEndpoint {
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
        }
    }

    /// Both URL and model are required before a request is attempted.
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.model.trim().is_empty()
    }
}

/// Settings handed to a single backend by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendSettings {
    Cloud(CloudSettings),
    Local(LocalEndpoint),
}

/// Which files a project upload keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadFilterRules {
    /// File-name suffixes to keep (`.rs`, `Dockerfile`, ...).
    pub allowed_extensions: Vec<String>,
    /// Directory names that are never descended.
    pub ignored_dirs: Vec<String>,
    /// Exact file names to drop.
    pub ignored_files: Vec<String>,
}

impl Default for UploadFilterRules {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            allowed_extensions: owned(constants::DEFAULT_ALLOWED_EXTENSIONS),
            ignored_dirs: owned(constants::DEFAULT_IGNORED_DIRS),
            ignored_files: owned(constants::DEFAULT_IGNORED_FILES),
        }
    }
}

/// Split a user-entered list on commas and newlines, dropping blanks.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl AppConfig {
    /// Resolve the settings to use for this process.
    ///
    /// Starts from the newest saved snapshot (or the defaults when there is
    /// none) and applies environment overrides. A broken history file is
    /// reported and otherwise ignored so the tool stays usable.
    pub fn load(store: &dyn ConfigStore, env: &Env) -> Self {
        let mut config = match store.load() {
            Ok(history) => history
                .into_iter()
                .next()
                .map(|snapshot| snapshot.config)
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable settings history");
                eprintln!("Warning: {e}. Falling back to default settings.");
                AppConfig::default()
            }
        };
        config.apply_env_vars(env);
        config
    }

    /// Read settings from a TOML file. Missing sections keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render as TOML with the API key masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.providers.gemini.api_key().is_some() {
            shown.providers.gemini.api_key = Some("[REDACTED]".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Set one settings key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let providers = &mut self.providers;
        match key {
            "gemini.api_key" => {
                let trimmed = value.trim();
                providers.gemini.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            "gemini.model" => providers.gemini.model = value.trim().to_string(),
            "ollama.url" => providers.ollama.url = value.trim().to_string(),
            "ollama.model" => providers.ollama.model = value.trim().to_string(),
            "lmstudio.url" => providers.lmstudio.url = value.trim().to_string(),
            "lmstudio.model" => providers.lmstudio.model = value.trim().to_string(),
            "upload.allowed_extensions" => self.upload.allowed_extensions = parse_list(value),
            "upload.ignored_dirs" => self.upload.ignored_dirs = parse_list(value),
            "upload.ignored_files" => self.upload.ignored_files = parse_list(value),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        let providers = &mut self.providers;
        if let Some(key) = env.first_non_empty(&[
            constants::ENV_GEMINI_API_KEY,
            constants::ENV_GEMINI_API_KEY_FALLBACK,
        ]) {
            providers.gemini.api_key = Some(key);
        }
        if let Some(model) = env.non_empty(constants::ENV_GEMINI_MODEL) {
            providers.gemini.model = model;
        }
        if let Some(url) = env.non_empty(constants::ENV_OLLAMA_URL) {
            providers.ollama.url = url;
        }
        if let Some(model) = env.non_empty(constants::ENV_OLLAMA_MODEL) {
            providers.ollama.model = model;
        }
        if let Some(url) = env.non_empty(constants::ENV_LMSTUDIO_URL) {
            providers.lmstudio.url = url;
        }
        if let Some(model) = env.non_empty(constants::ENV_LMSTUDIO_MODEL) {
            providers.lmstudio.model = model;
        }
    }
}
