//! Shared application state for the Axum server.
//!
//! Everything here is immutable after startup; requests share nothing mutable.

use std::sync::Arc;

use crate::catalog::{CatalogSource, HttpCatalog};
use crate::config::GatewayConfig;
use crate::inference::{CompletionSource, IntentResolver, OllamaClient};
use crate::mock::{MockCatalog, MockCompletion};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Query → filter resolver backed by a completion source.
    pub resolver: Arc<IntentResolver>,
    /// Product list source.
    pub catalog: Arc<dyn CatalogSource>,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create state from explicit sources, using default CORS origins.
    pub fn new(resolver: IntentResolver, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            catalog,
            cors_origins: GatewayConfig::default().cors_origins,
        }
    }

    /// Wire the Ollama client and HTTP catalog described by `config`.
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let completion: Arc<dyn CompletionSource> = Arc::new(OllamaClient::new(&config.ollama)?);
        let catalog: Arc<dyn CatalogSource> = Arc::new(HttpCatalog::new(&config.catalog)?);
        let resolver = IntentResolver::new(completion, config.ollama.completion_options());

        Ok(Self {
            resolver: Arc::new(resolver),
            catalog,
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// In-memory state for tests: a canned model reply and the sample catalog.
    pub fn with_mocks(model_reply: &str) -> Self {
        let completion = Arc::new(MockCompletion::replying(model_reply));
        let resolver = IntentResolver::new(
            completion,
            crate::config::OllamaConfig::default().completion_options(),
        );
        Self::new(resolver, Arc::new(MockCatalog::with_sample_data()))
    }
}
