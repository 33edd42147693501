use std::io::{BufRead, IsTerminal};

use codecritic_core::{CredentialPanel, CriticError, PanelState};

use super::Context;
use crate::output::Reporter;

/// Run `codecritic key set`.
///
/// Without `key`, prompts with hidden input on a terminal or reads one line
/// from piped stdin.
pub fn run_key_set(key: Option<&str>, ctx: &Context, reporter: &mut Reporter) -> bool {
    let input = match key {
        Some(k) => k.to_string(),
        None => match read_key_interactively() {
            Ok(k) => k,
            Err(e) => {
                reporter.error(&format!("Failed to read API key: {e}"));
                return false;
            }
        },
    };

    let mut panel = CredentialPanel::new(ctx.store.clone());
    let replacing = panel.state() == PanelState::Configured;
    panel.begin_edit();

    match panel.save(&input) {
        Ok(()) => {
            let verb = if replacing { "updated" } else { "saved" };
            reporter.success_with_details(
                &format!("API key {verb}"),
                &format!("backend: {}", ctx.store.backend()),
            );
            true
        }
        Err(e @ CriticError::EmptyCredential) => {
            panel.cancel();
            reporter.error(&format!("{e}"));
            false
        }
        Err(e) => {
            reporter.error(&format!("Failed to save API key: {e}"));
            false
        }
    }
}

/// Run `codecritic key status`. Fails when no key is stored.
pub fn run_key_status(ctx: &Context, reporter: &mut Reporter) -> bool {
    match ctx.store.configured_key() {
        Some(key) => {
            reporter.success_with_details(
                &format!("API key configured ({})", mask_key(&key)),
                &format!(
                    "backend: {}, config: {}",
                    ctx.store.backend(),
                    ctx.config_dir.display()
                ),
            );
            true
        }
        None => {
            reporter.warning("API key not configured. Run `codecritic key set` to add one.");
            reporter.info("Get an API key at https://aistudio.google.com/app/apikey");
            false
        }
    }
}

/// Run `codecritic key remove`.
pub fn run_key_remove(ctx: &Context, reporter: &mut Reporter) -> bool {
    let mut panel = CredentialPanel::new(ctx.store.clone());
    let had_key = panel.has_key();
    match panel.remove() {
        Ok(()) => {
            if had_key {
                reporter.success("API key removed");
            } else {
                reporter.info("No API key was stored");
            }
            true
        }
        Err(e) => {
            reporter.error(&format!("Failed to remove API key: {e}"));
            false
        }
    }
}

fn read_key_interactively() -> Result<String, String> {
    if std::io::stdin().is_terminal() {
        dialoguer::Password::new()
            .with_prompt("Gemini API key")
            .interact()
            .map_err(|e| e.to_string())
    } else {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| e.to_string())?;
        Ok(line)
    }
}

/// Show only the ends of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
