//! Shared test harness for E2E integration tests.
//!
//! Runs the real router with the real Ollama and catalog HTTP clients,
//! pointed at two wiremock servers.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sq_gateway::config::{CatalogConfig, GatewayConfig, OllamaConfig};
use sq_gateway::mock::sample_products;
use sq_gateway::routes::build_router;
use sq_gateway::state::AppState;

/// End-to-end harness: gateway router + mocked Ollama + mocked catalog.
pub struct TestHarness {
    /// Mock Ollama server (`POST /api/generate`).
    pub ollama: MockServer,
    /// Mock store API (`GET /products`).
    pub catalog: MockServer,
    /// Gateway router for requests via `tower::oneshot`.
    pub router: Router,
}

impl TestHarness {
    /// Start both mock servers with the given client timeouts.
    pub async fn with_timeouts(ollama_timeout_secs: u64, catalog_timeout_secs: u64) -> Self {
        let ollama = MockServer::start().await;
        let catalog = MockServer::start().await;

        let config = GatewayConfig {
            ollama: OllamaConfig {
                host: ollama.uri(),
                timeout_secs: ollama_timeout_secs,
                ..OllamaConfig::default()
            },
            catalog: CatalogConfig {
                url: format!("{}/products", catalog.uri()),
                timeout_secs: catalog_timeout_secs,
            },
            ..GatewayConfig::default()
        };

        let state = AppState::from_config(&config).expect("state from config");
        Self {
            ollama,
            catalog,
            router: build_router(state),
        }
    }

    pub async fn start() -> Self {
        Self::with_timeouts(5, 5).await
    }

    /// Make the model answer every prompt with `text`.
    pub async fn model_replies(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "response": text,
                "done": true,
            })))
            .mount(&self.ollama)
            .await;
    }

    /// Serve the sample product list from the catalog.
    pub async fn catalog_serves_sample(&self) {
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_products()))
            .mount(&self.catalog)
            .await;
    }

    /// Model reply and sample catalog in one call.
    pub async fn with_reply(text: &str) -> Self {
        let h = Self::start().await;
        h.model_replies(text).await;
        h.catalog_serves_sample().await;
        h
    }

    /// POST /nlp-search with the given JSON body.
    pub async fn post_search(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/nlp-search")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// Search for `query`.
    pub async fn search(&self, query: &str) -> (StatusCode, serde_json::Value) {
        self.post_search(serde_json::json!({ "query": query })).await
    }

    /// Number of requests each mock server has received.
    pub async fn upstream_calls(&self) -> (usize, usize) {
        let ollama = self.ollama.received_requests().await.unwrap_or_default().len();
        let catalog = self.catalog.received_requests().await.unwrap_or_default().len();
        (ollama, catalog)
    }
}

/// Product ids from a search response, in order.
pub fn result_ids(json: &serde_json::Value) -> Vec<i64> {
    json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}
