pub mod config;
pub mod credential;
pub mod error;
pub mod keystore;
pub mod render;
pub mod review;
pub mod shell;

pub use config::{KeyBackend, Settings};
pub use credential::{CredentialPanel, PanelState};
pub use error::{CriticError, ErrorKind};
pub use keystore::{open_key_store, FileKeyStore, KeyStore, MemoryKeyStore};
pub use render::RenderPipeline;
pub use review::ReviewClient;
pub use shell::{Phase, ReviewShell, ReviewTicket, Trigger, UiState};
