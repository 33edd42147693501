pub mod key;
pub mod review;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use codecritic_core::config::resolve_config_dir;
use codecritic_core::keystore::open_key_store;
use codecritic_core::{KeyStore, Settings};

use crate::output::Reporter;

/// Everything a command needs from the configuration directory.
pub struct Context {
    pub config_dir: PathBuf,
    pub settings: Settings,
    pub store: Arc<dyn KeyStore>,
}

/// Resolves the configuration directory, settings, and key store, reporting
/// an error if any of them cannot be loaded.
pub fn load_context(config_dir_override: Option<&Path>, reporter: &mut Reporter) -> Option<Context> {
    let config_dir = match resolve_config_dir(config_dir_override) {
        Ok(dir) => dir,
        Err(e) => {
            reporter.error(&format!("{e}"));
            return None;
        }
    };

    let settings = match Settings::load(&config_dir) {
        Ok(s) => s,
        Err(e) => {
            reporter.error(&format!("Failed to load settings: {e}"));
            return None;
        }
    };

    let store = match open_key_store(&config_dir, settings.key_store) {
        Ok(s) => s,
        Err(e) => {
            reporter.error(&format!("{e}"));
            return None;
        }
    };

    Some(Context {
        config_dir,
        settings,
        store,
    })
}
