//! Natural-language inference for search queries.
//!
//! Converts shopper text ("cheap jackets under $50") into a structured
//! `Filter` through a language-model completion call.
//!
//! - **CompletionSource**: the model endpoint (Ollama in production, mocks in tests).
//! - **IntentResolver**: prompt construction, defensive JSON parsing and
//!   sanitization of the model output.

pub mod ollama;
pub mod resolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generation options sent with a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Model identifier (e.g. "mistral").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Ask the endpoint to constrain output to JSON.
    pub json_format: bool,
}

/// Errors raised while obtaining or parsing a model completion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    /// Transport failure or timeout talking to the endpoint.
    #[error("completion request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The model text held no usable JSON object.
    #[error("model returned non-JSON output: {0}")]
    Parse(String),
}

/// Convenience alias for inference results.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// A text-completion backend.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Generate text for `prompt`. One attempt, no retries.
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> InferenceResult<String>;

    /// Backend name (for logging).
    fn name(&self) -> &str;
}

pub use ollama::OllamaClient;
pub use resolver::IntentResolver;
