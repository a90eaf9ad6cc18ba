//! Ollama completion client (`/api/generate`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionOptions, CompletionSource, InferenceError, InferenceResult};
use crate::config::OllamaConfig;

/// Ollama generate API request body.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
}

/// Ollama generate API response (only fields we need).
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for an Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    host: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> InferenceResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl CompletionSource for OllamaClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> InferenceResult<String> {
        let url = format!("{}/api/generate", self.host);

        let body = GenerateRequest {
            model: &options.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
            },
            format: options.json_format.then_some("json"),
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "ollama request timed out");
                InferenceError::Request(format!("timed out after {}s", self.timeout.as_secs()))
            } else {
                tracing::warn!(error = %e, "ollama request failed");
                InferenceError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "ollama returned non-success status");
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to decode ollama response body");
            InferenceError::Request(format!("invalid response body: {e}"))
        })?;

        Ok(generated.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
