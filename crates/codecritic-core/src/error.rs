use thiserror::Error;

/// Coarse classification of a [`CriticError`], used by front ends to decide
/// how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input; recovered locally, no call made.
    Validation,
    /// No credential stored.
    Configuration,
    /// Any failure talking to the model service.
    Service,
    /// Markdown or sanitizer capability missing.
    Render,
    /// Local filesystem or serialization failure.
    Io,
}

#[derive(Debug, Error)]
pub enum CriticError {
    #[error("Please enter some code to review.")]
    EmptyInput,

    #[error("API key must not be empty.")]
    EmptyCredential,

    #[error("API key not configured. Please set your API key in the configuration.")]
    NotConfigured,

    #[error(
        "Failed to get review from Gemini API. Please check your API key and network connection."
    )]
    Service,

    /// Detailed provider failure. Logged, then collapsed into [`CriticError::Service`]
    /// before it reaches the user.
    #[error("LLM API error: {0}")]
    Provider(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl CriticError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CriticError::EmptyInput | CriticError::EmptyCredential => ErrorKind::Validation,
            CriticError::NotConfigured => ErrorKind::Configuration,
            CriticError::Service | CriticError::Provider(_) => ErrorKind::Service,
            CriticError::RendererUnavailable(_) => ErrorKind::Render,
            CriticError::Io(_) | CriticError::Json(_) | CriticError::Other(_) => ErrorKind::Io,
        }
    }
}
