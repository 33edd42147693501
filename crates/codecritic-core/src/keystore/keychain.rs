//! OS keychain key store (enabled with the `keyring` feature).

use super::{KeyStore, API_KEY_NAME};
use crate::error::CriticError;

const SERVICE: &str = "codecritic";

/// Stores the credential in the platform keychain (Keychain on macOS,
/// Credential Manager on Windows, keyutils on Linux).
#[derive(Debug, Default)]
pub struct KeyringKeyStore;

impl KeyringKeyStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self) -> Result<keyring::Entry, CriticError> {
        keyring::Entry::new(SERVICE, API_KEY_NAME)
            .map_err(|e| CriticError::Other(format!("Keyring error: {e}")))
    }
}

impl KeyStore for KeyringKeyStore {
    fn get(&self) -> Option<String> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("[KEYSTORE] {e}");
                return None;
            }
        };
        match entry.get_password() {
            Ok(key) => Some(key),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                log::warn!("[KEYSTORE] Cannot read keychain entry: {e}");
                None
            }
        }
    }

    fn set(&self, value: &str) -> Result<(), CriticError> {
        self.entry()?
            .set_password(value)
            .map_err(|e| CriticError::Other(format!("Failed to save key: {e}")))?;
        log::info!("[KEYSTORE] API key saved to OS keychain");
        Ok(())
    }

    fn clear(&self) -> Result<(), CriticError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                log::info!("[KEYSTORE] API key removed from OS keychain");
                Ok(())
            }
            Err(e) => Err(CriticError::Other(format!("Failed to remove key: {e}"))),
        }
    }

    fn backend(&self) -> &str {
        "keyring"
    }
}
