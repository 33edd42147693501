//! LLM provider abstraction for code reviews.
//!
//! [`GeminiProvider`] talks to the Google Gemini `generateContent` API.
//! [`MockProvider`] and [`FailingProvider`] stand in for it in tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::DEFAULT_API_BASE;
use crate::error::CriticError;

/// Trait for LLM API providers.
///
/// Implementations must be `Send + Sync` so a provider can be moved onto a
/// worker thread while the caller keeps animating progress. The `complete`
/// method is synchronous (using `reqwest::blocking`): a review is exactly one
/// request and the caller already owns the thread it runs on.
pub trait LlmProvider: Send + Sync {
    /// Send `content` with `system_instruction` and return the completion text.
    fn complete(&self, system_instruction: &str, content: &str) -> Result<String, CriticError>;

    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier being used (e.g., "gemini-2.5-flash").
    fn model(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

/// LLM provider for the Google Gemini generateContent API.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::blocking::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// If `model` is `None`, defaults to `gemini-2.5-flash`.
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| crate::config::DEFAULT_MODEL.to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Point the provider at a different API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Build the JSON body for a `generateContent` call.
pub fn build_request_body(system_instruction: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "systemInstruction": {
            "parts": [{"text": system_instruction}]
        },
        "contents": [
            {"role": "user", "parts": [{"text": content}]}
        ]
    })
}

/// Pull the response text out of a `generateContent` reply.
///
/// Gemini may split one answer over several parts; they are joined in order.
/// Returns `None` when the first candidate carries no text at all.
pub fn extract_text(json: &serde_json::Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

impl LlmProvider for GeminiProvider {
    fn complete(&self, system_instruction: &str, content: &str) -> Result<String, CriticError> {
        let body = build_request_body(system_instruction, content);

        log::debug!("[REVIEW] POST {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| CriticError::Provider(format!("Request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(CriticError::Provider(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| CriticError::Provider(format!("Failed to parse response: {e}")))?;

        extract_text(&json).ok_or_else(|| CriticError::Provider("No text in response".into()))
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Mock (for testing)
// ---------------------------------------------------------------------------

/// A mock LLM provider that returns a fixed response. For use in tests.
pub struct MockProvider {
    response: String,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock provider that always returns the given response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `complete` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, _system_instruction: &str, _content: &str) -> Result<String, CriticError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// A provider whose every call fails with the given detail. For use in tests.
pub struct FailingProvider {
    detail: String,
}

impl FailingProvider {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl LlmProvider for FailingProvider {
    fn complete(&self, _system_instruction: &str, _content: &str) -> Result<String, CriticError> {
        Err(CriticError::Provider(self.detail.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
