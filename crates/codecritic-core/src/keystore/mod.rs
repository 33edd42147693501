//! Persistent storage for the single Gemini API key.
//!
//! Front ends depend on the [`KeyStore`] trait rather than on a concrete
//! backend so the store can be swapped for [`MemoryKeyStore`] in tests.

mod file;
#[cfg(feature = "keyring")]
mod keychain;

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::KeyBackend;
use crate::error::CriticError;

pub use file::FileKeyStore;
#[cfg(feature = "keyring")]
pub use keychain::KeyringKeyStore;

/// Fixed name the credential is stored under.
pub const API_KEY_NAME: &str = "gemini_api_key";

/// Storage for one credential string.
///
/// Implementations use interior mutability so a store can be shared between
/// the review client and the credential panel.
pub trait KeyStore: Send + Sync {
    /// Return the stored credential, or `None`. Backend failures are logged
    /// and reported as absence.
    fn get(&self) -> Option<String>;

    /// Persist `value` verbatim, replacing any previous credential.
    fn set(&self, value: &str) -> Result<(), CriticError>;

    /// Remove the stored credential. Succeeds when nothing is stored.
    fn clear(&self) -> Result<(), CriticError>;

    /// Short backend name for status output (e.g., "file", "keyring").
    fn backend(&self) -> &str;

    /// The stored credential if it is usable. A blank value counts as not
    /// configured.
    fn configured_key(&self) -> Option<String> {
        self.get().filter(|key| !key.trim().is_empty())
    }
}

/// Open the key store selected by `backend`.
pub fn open_key_store(
    config_dir: &Path,
    backend: KeyBackend,
) -> Result<Arc<dyn KeyStore>, CriticError> {
    match backend {
        KeyBackend::File => Ok(Arc::new(FileKeyStore::new(config_dir))),
        #[cfg(feature = "keyring")]
        KeyBackend::Keyring => Ok(Arc::new(KeyringKeyStore::new())),
        #[cfg(not(feature = "keyring"))]
        KeyBackend::Keyring => Err(CriticError::Other(
            "keyStore \"keyring\" requires building with the `keyring` feature".into(),
        )),
    }
}

/// In-process key store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    value: Mutex<Option<String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value`.
    pub fn with_key(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self) -> Option<String> {
        self.value.lock().ok().and_then(|v| v.clone())
    }

    fn set(&self, value: &str) -> Result<(), CriticError> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| CriticError::Other("key store lock poisoned".into()))?;
        *guard = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CriticError> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| CriticError::Other("key store lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
