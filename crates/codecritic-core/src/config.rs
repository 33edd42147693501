//! Configuration directory discovery and `settings.json` loading.
//!
//! The configuration directory holds both `settings.json` (optional) and the
//! credential file written by [`FileKeyStore`](crate::keystore::FileKeyStore).
//! It is resolved from, in order: an explicit override (the CLI's
//! `--config-dir`), the `CODECRITIC_CONFIG_DIR` environment variable, and
//! finally the platform config directory joined with `codecritic`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CriticError;

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CODECRITIC_CONFIG_DIR";

/// Model used when no override is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const SETTINGS_FILE: &str = "settings.json";

/// Where the API key is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyBackend {
    /// `credentials.json` in the configuration directory.
    #[default]
    File,
    /// The OS keychain. Requires the `keyring` feature.
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Gemini model identifier.
    pub model: String,
    /// API base URL, without a trailing slash.
    pub api_base: String,
    pub key_store: KeyBackend,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            key_store: KeyBackend::File,
        }
    }
}

impl Settings {
    /// Load `settings.json` from `config_dir`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// parsed is an error rather than being silently ignored.
    pub fn load(config_dir: &Path) -> Result<Self, CriticError> {
        let path = config_dir.join(SETTINGS_FILE);
        if !path.is_file() {
            log::debug!("[CONFIG] No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let mut settings: Settings = serde_json::from_str(&content)?;
        settings.api_base = settings.api_base.trim_end_matches('/').to_string();
        log::info!("[CONFIG] Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Replace the model when `model` is `Some`.
    pub fn with_model_override(mut self, model: Option<&str>) -> Self {
        if let Some(m) = model {
            self.model = m.to_string();
        }
        self
    }
}

/// Resolve the configuration directory.
///
/// Returns `CriticError::Other` only when no override is given and the
/// platform has no notion of a config directory.
pub fn resolve_config_dir(override_dir: Option<&Path>) -> Result<PathBuf, CriticError> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|d| d.join("codecritic"))
        .ok_or_else(|| CriticError::Other("Cannot determine configuration directory".into()))
}
