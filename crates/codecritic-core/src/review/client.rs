use std::sync::Arc;

use crate::config::Settings;
use crate::error::CriticError;
use crate::keystore::KeyStore;
use crate::review::provider::{GeminiProvider, LlmProvider};
use crate::review::rubric::REVIEW_RUBRIC;

/// Builds a provider for a given API key.
///
/// The key is read from the store on every review, so the provider is built
/// per call rather than held by the client.
pub type ProviderFactory = Box<dyn Fn(String) -> Box<dyn LlmProvider> + Send + Sync>;

/// One snippet to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub source_text: String,
}

impl ReviewRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
        }
    }

    /// The fixed system instruction sent alongside the snippet.
    pub fn system_instruction(&self) -> &'static str {
        REVIEW_RUBRIC
    }
}

/// Sends a snippet to the model and classifies the outcome.
///
/// Exactly one provider call is made per [`review`](ReviewClient::review);
/// there are no retries.
pub struct ReviewClient {
    store: Arc<dyn KeyStore>,
    factory: ProviderFactory,
}

impl ReviewClient {
    pub fn new(store: Arc<dyn KeyStore>, factory: ProviderFactory) -> Self {
        Self { store, factory }
    }

    /// A client backed by [`GeminiProvider`] configured from `settings`.
    pub fn gemini(store: Arc<dyn KeyStore>, settings: &Settings) -> Self {
        let model = settings.model.clone();
        let api_base = settings.api_base.clone();
        Self::new(
            store,
            Box::new(move |key| -> Box<dyn LlmProvider> {
                Box::new(GeminiProvider::new(key, Some(model.clone())).with_api_base(&api_base))
            }),
        )
    }

    /// Review `source_text`, returning the model's Markdown unmodified.
    ///
    /// # Errors
    ///
    /// - [`CriticError::NotConfigured`] when no API key, or only a blank one,
    ///   is stored; no provider is built and nothing is sent.
    /// - [`CriticError::Service`] for any provider failure. The underlying
    ///   detail is logged, not returned.
    pub fn review(&self, source_text: &str) -> Result<String, CriticError> {
        self.send(&ReviewRequest::new(source_text))
    }

    /// Same as [`review`](ReviewClient::review) for a prepared request.
    pub fn send(&self, request: &ReviewRequest) -> Result<String, CriticError> {
        let api_key = self.store.configured_key().ok_or(CriticError::NotConfigured)?;

        let provider = (self.factory)(api_key);
        log::info!(
            "[REVIEW] Requesting review from {} ({}), {} bytes",
            provider.name(),
            provider.model(),
            request.source_text.len()
        );

        match provider.complete(request.system_instruction(), &request.source_text) {
            Ok(text) => {
                log::info!("[REVIEW] Received {} bytes of feedback", text.len());
                Ok(text)
            }
            Err(e) => {
                log::error!("[REVIEW] Error calling {} API: {e}", provider.name());
                Err(CriticError::Service)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::keystore::{FileKeyStore, MemoryKeyStore};
    use crate::review::provider::{FailingProvider, MockProvider};

    /// Captures what the client sent.
    struct RecordingProvider {
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl LlmProvider for RecordingProvider {
        fn complete(&self, system: &str, content: &str) -> Result<String, CriticError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), content.to_string()));
            Ok("ok".into())
        }

        fn name(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "recording-model"
        }
    }

    fn counting_factory(counter: Arc<AtomicUsize>, response: &'static str) -> ProviderFactory {
        Box::new(move |_key| -> Box<dyn LlmProvider> {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(MockProvider::new(response))
        })
    }

    #[test]
    fn missing_key_fails_without_building_provider() {
        let built = Arc::new(AtomicUsize::new(0));
        let client = ReviewClient::new(
            Arc::new(MemoryKeyStore::new()),
            counting_factory(built.clone(), "unused"),
        );

        for _ in 0..3 {
            match client.review("x=1") {
                Err(CriticError::NotConfigured) => {}
                other => panic!("Expected NotConfigured, got: {other:?}"),
            }
        }
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn blank_stored_key_counts_as_not_configured() {
        for stored in ["", "   \t"] {
            let built = Arc::new(AtomicUsize::new(0));
            let client = ReviewClient::new(
                Arc::new(MemoryKeyStore::with_key(stored)),
                counting_factory(built.clone(), "unused"),
            );

            assert!(matches!(client.review("x=1"), Err(CriticError::NotConfigured)));
            assert_eq!(built.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn empty_key_in_credential_file_is_not_sent() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("credentials.json"),
            r#"{"gemini_api_key": ""}"#,
        )
        .unwrap();
        let store = Arc::new(FileKeyStore::new(tmp.path()));
        assert_eq!(store.get().as_deref(), Some(""));

        let built = Arc::new(AtomicUsize::new(0));
        let client = ReviewClient::new(store, counting_factory(built.clone(), "unused"));

        match client.review("x=1") {
            Err(CriticError::NotConfigured) => {}
            other => panic!("Expected NotConfigured, got: {other:?}"),
        }
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn success_returns_text_unmodified() {
        let built = Arc::new(AtomicUsize::new(0));
        let client = ReviewClient::new(
            Arc::new(MemoryKeyStore::with_key("AIza-test")),
            counting_factory(built.clone(), "### Bugs\nNone found."),
        );

        let review = client.review("function f(){}").unwrap();
        assert_eq!(review, "### Bugs\nNone found.");
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn provider_failure_becomes_generic_service_error() {
        let client = ReviewClient::new(
            Arc::new(MemoryKeyStore::with_key("bad-key")),
            Box::new(|_| -> Box<dyn LlmProvider> {
                Box::new(FailingProvider::new("HTTP 400: API key not valid"))
            }),
        );

        let err = client.review("x=1").unwrap_err();
        assert!(matches!(err, CriticError::Service));
        assert!(!err.to_string().contains("HTTP 400"));
    }

    #[test]
    fn factory_receives_stored_key() {
        let keys = Arc::new(Mutex::new(Vec::new()));
        let seen = keys.clone();
        let client = ReviewClient::new(
            Arc::new(MemoryKeyStore::with_key("AIza-xyz")),
            Box::new(move |key| -> Box<dyn LlmProvider> {
                seen.lock().unwrap().push(key);
                Box::new(MockProvider::new("ok"))
            }),
        );

        client.review("x=1").unwrap();
        assert_eq!(*keys.lock().unwrap(), vec!["AIza-xyz".to_string()]);
    }

    #[test]
    fn request_carries_rubric_and_literal_source() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let client = ReviewClient::new(
            Arc::new(MemoryKeyStore::with_key("k")),
            Box::new(move |_| -> Box<dyn LlmProvider> {
                Box::new(RecordingProvider {
                    seen: sink.clone(),
                })
            }),
        );

        client.review("  let x = 1;\n").unwrap();

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, REVIEW_RUBRIC);
        assert_eq!(calls[0].1, "  let x = 1;\n");
    }

    #[test]
    fn key_removed_between_reviews_is_noticed() {
        let store = Arc::new(MemoryKeyStore::with_key("k"));
        let client = ReviewClient::new(
            store.clone(),
            Box::new(|_| -> Box<dyn LlmProvider> { Box::new(MockProvider::new("fine")) }),
        );

        assert_eq!(client.review("a").unwrap(), "fine");
        store.clear().unwrap();
        assert!(matches!(client.review("a"), Err(CriticError::NotConfigured)));
    }
}
