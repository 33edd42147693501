use std::io::Read;
use std::path::Path;
use std::time::Duration;

use codecritic_core::review::{save_report, ReviewReport};
use codecritic_core::{RenderPipeline, ReviewClient, ReviewShell, Trigger};
use indicatif::{ProgressBar, ProgressStyle};

use super::Context;
use crate::output::{OutputMode, Reporter};

/// Run the `codecritic review` command.
///
/// Reads the snippet, drives a [`ReviewShell`] through one review, prints the
/// Markdown, and optionally writes sanitized HTML and a report.
pub fn run_review(
    input: Option<&str>,
    html_path: Option<&Path>,
    output_dir: Option<&Path>,
    model: Option<&str>,
    ctx: &Context,
    reporter: &mut Reporter,
) -> bool {
    let (name, code) = match read_input(input) {
        Ok(v) => v,
        Err(e) => {
            reporter.error(&e);
            return false;
        }
    };

    let settings = ctx.settings.clone().with_model_override(model);
    let client = ReviewClient::gemini(ctx.store.clone(), &settings);

    let mut shell = ReviewShell::new();
    shell.set_code(code);

    let ticket = match shell.trigger() {
        Trigger::Started(ticket) => ticket,
        Trigger::Rejected | Trigger::Busy => {
            reporter.error(&shell.state().error);
            return false;
        }
    };

    let spinner = spinner(reporter.mode(), &settings.model);
    let result = client.review(ticket.source_text());
    spinner.finish_and_clear();
    shell.resolve(&ticket, result);

    let state = shell.state();
    if !state.error.is_empty() {
        reporter.error(&state.error);
        return false;
    }

    let html = if html_path.is_some() {
        match shell.rendered_review(&RenderPipeline::default()) {
            Ok(Some(html)) => Some(html),
            Ok(None) => {
                reporter.warning("The review was empty; the HTML output is empty too");
                Some(String::new())
            }
            Err(e) => {
                reporter.error(&format!("{e}"));
                return false;
            }
        }
    } else {
        None
    };

    reporter.review(&state.review, &settings.model);

    if let (Some(path), Some(body)) = (html_path, html.as_deref()) {
        if let Err(e) = std::fs::write(path, body) {
            reporter.error(&format!("Failed to write {}: {e}", path.display()));
            return false;
        }
        reporter.info(&format!("HTML written to {}", path.display()));
    }

    if let Some(dir) = output_dir {
        let report = ReviewReport {
            name,
            provider_name: "gemini".to_string(),
            model_name: settings.model.clone(),
            review_text: state.review.clone(),
        };
        match save_report(dir, &report, html.as_deref()) {
            Ok(paths) => reporter.info(&format!("Review report saved to {}", paths.markdown.display())),
            Err(e) => {
                reporter.error(&format!("Failed to save report: {e}"));
                return false;
            }
        }
    }

    true
}

/// Read the snippet from a file, or stdin for `None` / `"-"`.
fn read_input(input: Option<&str>) -> Result<(String, String), String> {
    match input {
        None | Some("-") => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            Ok(("snippet".to_string(), code))
        }
        Some(path) => {
            let code = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {path}: {e}"))?;
            let name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string());
            Ok((name, code))
        }
    }
}

fn spinner(mode: OutputMode, model: &str) -> ProgressBar {
    if mode != OutputMode::Human {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Reviewing with {model}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
