//! Markdown to sanitized HTML.
//!
//! The pipeline is two injected capabilities applied in order:
//! [`MarkdownToHtml`] then [`HtmlSanitizer`]. Both are pure, so rendering the
//! same Markdown twice yields identical HTML. A pipeline missing either half
//! refuses to render instead of passing raw text through.

use pulldown_cmark::{html, Options, Parser};

use crate::error::CriticError;

/// Converts Markdown to (unsanitized) HTML.
pub trait MarkdownToHtml: Send + Sync {
    fn markdown_to_html(&self, markdown: &str) -> String;
}

/// Removes anything unsafe from an HTML fragment.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

impl<F> MarkdownToHtml for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn markdown_to_html(&self, markdown: &str) -> String {
        self(markdown)
    }
}

impl<F> HtmlSanitizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, html: &str) -> String {
        self(html)
    }
}

/// CommonMark renderer with the GitHub extensions models tend to emit.
#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkRenderer;

impl MarkdownToHtml for CmarkRenderer {
    fn markdown_to_html(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Sanitizer using ammonia's default allow-list.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        ammonia::clean(html)
    }
}

pub struct RenderPipeline {
    markdown: Option<Box<dyn MarkdownToHtml>>,
    sanitizer: Option<Box<dyn HtmlSanitizer>>,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(Box::new(CmarkRenderer), Box::new(AmmoniaSanitizer))
    }
}

impl RenderPipeline {
    pub fn new(markdown: Box<dyn MarkdownToHtml>, sanitizer: Box<dyn HtmlSanitizer>) -> Self {
        Self {
            markdown: Some(markdown),
            sanitizer: Some(sanitizer),
        }
    }

    /// A pipeline with neither capability installed.
    pub fn empty() -> Self {
        Self {
            markdown: None,
            sanitizer: None,
        }
    }

    pub fn with_markdown(mut self, markdown: Box<dyn MarkdownToHtml>) -> Self {
        self.markdown = Some(markdown);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Box<dyn HtmlSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Render `markdown` to sanitized HTML.
    pub fn render(&self, markdown: &str) -> Result<String, CriticError> {
        let to_html = self
            .markdown
            .as_ref()
            .ok_or(CriticError::RendererUnavailable("markdown parser"))?;
        let sanitizer = self
            .sanitizer
            .as_ref()
            .ok_or(CriticError::RendererUnavailable("HTML sanitizer"))?;

        let raw = to_html.markdown_to_html(markdown);
        Ok(sanitizer.sanitize(&raw))
    }
}
