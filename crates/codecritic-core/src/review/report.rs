//! Saving finished reviews to disk.

use std::path::{Path, PathBuf};

use crate::error::CriticError;

/// A finished review and where it came from.
#[derive(Debug, Clone)]
pub struct ReviewReport {
    /// Name of the reviewed input (file name, or "snippet" for stdin).
    pub name: String,
    /// Provider used for the review (e.g., "gemini").
    pub provider_name: String,
    /// Model used for the review (e.g., "gemini-2.5-flash").
    pub model_name: String,
    /// The full review text returned by the model.
    pub review_text: String,
}

/// Files written by [`save_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub html: Option<PathBuf>,
}

/// Write `report` to `output_dir` as `{stem}-review.md`, and `html` (already
/// sanitized) as `{stem}-review.html` when given.
pub fn save_report(
    output_dir: &Path,
    report: &ReviewReport,
    html: Option<&str>,
) -> Result<ReportPaths, CriticError> {
    std::fs::create_dir_all(output_dir)?;
    let stem = report_stem(&report.name);

    let markdown = output_dir.join(format!("{stem}-review.md"));
    let content = format!(
        "# Code Review: {}\n\n\
         **Provider:** {} ({})\n\
         **Date:** {}\n\n\
         ---\n\n\
         {}\n",
        report.name,
        report.provider_name,
        report.model_name,
        current_date_string(),
        report.review_text,
    );
    std::fs::write(&markdown, content)?;

    let html = match html {
        Some(body) => {
            let path = output_dir.join(format!("{stem}-review.html"));
            std::fs::write(&path, body)?;
            Some(path)
        }
        None => None,
    };

    log::info!("[REPORT] Review saved to {}", markdown.display());
    Ok(ReportPaths { markdown, html })
}

/// File-name-safe stem for a report.
fn report_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "snippet".to_string()
    } else {
        stem.to_string()
    }
}

/// Today's local date as `YYYY-MM-DD`.
fn current_date_string() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
