//! Access to the local text-completion service.
//!
//! The pipeline only needs one operation: send a prompt, get the raw
//! completion text back. Retrying is the caller's business.

mod ollama;

pub use ollama::OllamaClient;

use thiserror::Error;

/// Errors that can occur when calling the inference service.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for InferenceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            InferenceError::Timeout
        } else if e.is_decode() {
            InferenceError::MalformedResponse(e.to_string())
        } else {
            InferenceError::Connection(e.to_string())
        }
    }
}

/// A blocking, non-streaming completion endpoint.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait InferenceBackend: Send + Sync {
    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Runs one completion and returns the raw response text.
    fn infer(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Checks that the service is reachable.
    fn health_check(&self) -> Result<(), InferenceError>;
}
