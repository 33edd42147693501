//! The three-state API key control: configured, editing, unconfigured.

use std::sync::Arc;

use crate::error::CriticError;
use crate::keystore::KeyStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// A key is stored and the input is hidden.
    Configured,
    /// A key is stored and the user is typing a replacement.
    Editing,
    /// No key is stored; the input is shown.
    Unconfigured,
}

pub struct CredentialPanel {
    store: Arc<dyn KeyStore>,
    state: PanelState,
}

impl CredentialPanel {
    /// Create a panel whose initial state reflects what `store` holds.
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        let state = if store.configured_key().is_some() {
            PanelState::Configured
        } else {
            PanelState::Unconfigured
        };
        Self { store, state }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn has_key(&self) -> bool {
        self.state != PanelState::Unconfigured
    }

    /// Show the input for replacing a stored key.
    pub fn begin_edit(&mut self) {
        if self.state == PanelState::Configured {
            self.state = PanelState::Editing;
        }
    }

    /// Hide the input again, keeping the stored key.
    pub fn cancel(&mut self) {
        if self.state == PanelState::Editing {
            self.state = PanelState::Configured;
        }
    }

    /// Store the trimmed `input` as the API key.
    ///
    /// Blank input is rejected with [`CriticError::EmptyCredential`] and the
    /// store is not touched.
    pub fn save(&mut self, input: &str) -> Result<(), CriticError> {
        let key = input.trim();
        if key.is_empty() {
            return Err(CriticError::EmptyCredential);
        }
        self.store.set(key)?;
        self.state = PanelState::Configured;
        Ok(())
    }

    /// Delete the stored key.
    pub fn remove(&mut self) -> Result<(), CriticError> {
        self.store.clear()?;
        self.state = PanelState::Unconfigured;
        Ok(())
    }
}
