//! AI-powered code review.
//!
//! [`ReviewClient`] is the entry point: it reads the stored API key, sends
//! the snippet together with the fixed [`REVIEW_RUBRIC`] to an
//! [`LlmProvider`], and classifies the outcome. Finished reviews can be
//! written to disk with [`save_report`].

pub mod client;
pub mod provider;
pub mod report;
pub mod rubric;

pub use client::{ProviderFactory, ReviewClient, ReviewRequest};
pub use provider::{FailingProvider, GeminiProvider, LlmProvider, MockProvider};
pub use report::{save_report, ReportPaths, ReviewReport};
pub use rubric::REVIEW_RUBRIC;
