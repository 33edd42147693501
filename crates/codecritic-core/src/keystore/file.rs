//! JSON-file key store living in the configuration directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{KeyStore, API_KEY_NAME};
use crate::error::CriticError;

const CREDENTIALS_FILE: &str = "credentials.json";

/// Stores the credential in `{config_dir}/credentials.json`.
///
/// The file is a flat JSON object; entries other than [`API_KEY_NAME`] are
/// left untouched. Every write goes to a temporary file in the same directory
/// that is then renamed over the original, so a crash never leaves a
/// half-written file behind. On Unix the temporary file is created with mode
/// `0600`, which the rename preserves.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(CREDENTIALS_FILE),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<Map<String, Value>>, CriticError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let map: Map<String, Value> = serde_json::from_str(&content)?;
        Ok(Some(map))
    }

    /// Load for modification. An unreadable file is replaced instead of
    /// blocking the user from saving a fresh key.
    fn load_for_write(&self) -> Map<String, Value> {
        match self.load() {
            Ok(map) => map.unwrap_or_default(),
            Err(e) => {
                log::warn!(
                    "[KEYSTORE] Discarding unreadable {}: {e}",
                    self.path.display()
                );
                Map::new()
            }
        }
    }

    fn write(&self, map: &Map<String, Value>) -> Result<(), CriticError> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| CriticError::Other("Invalid credentials path".into()))?;
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        let content = serde_json::to_string_pretty(map)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| CriticError::Io(e.error))?;
        Ok(())
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self) -> Option<String> {
        match self.load() {
            Ok(Some(map)) => map
                .get(API_KEY_NAME)
                .and_then(Value::as_str)
                .map(str::to_string),
            Ok(None) => None,
            Err(e) => {
                log::warn!("[KEYSTORE] Cannot read {}: {e}", self.path.display());
                None
            }
        }
    }

    fn set(&self, value: &str) -> Result<(), CriticError> {
        let mut map = self.load_for_write();
        map.insert(API_KEY_NAME.to_string(), Value::String(value.to_string()));
        self.write(&map)?;
        log::info!("[KEYSTORE] API key saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), CriticError> {
        let mut map = match self.load() {
            Ok(Some(map)) => map,
            Ok(None) => return Ok(()),
            Err(e) => {
                log::warn!("[KEYSTORE] Removing unreadable {}: {e}", self.path.display());
                Map::new()
            }
        };

        map.remove(API_KEY_NAME);
        if map.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            self.write(&map)?;
        }
        log::info!("[KEYSTORE] API key removed");
        Ok(())
    }

    fn backend(&self) -> &str {
        "file"
    }
}
