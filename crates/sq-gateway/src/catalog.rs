//! Product catalog source — fetched fresh on every search, never cached.

use std::time::Duration;

use async_trait::async_trait;
use sq_protocol::Product;

use crate::config::CatalogConfig;

/// Errors raised while fetching the catalog.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),

    #[error("catalog returned status {0}")]
    Status(u16),

    #[error("invalid catalog payload: {0}")]
    Decode(String),
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A read-only source of the full product list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every product. One attempt, no retries.
    async fn fetch_products(&self) -> CatalogResult<Vec<Product>>;
}

/// HTTP catalog client for a FakeStore-compatible `GET /products` endpoint.
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_products(&self) -> CatalogResult<Vec<Product>> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "catalog request failed");
            CatalogError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = %status, "catalog returned non-success status");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let products: Vec<Product> = response.json().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "failed to decode catalog payload");
            CatalogError::Decode(e.to_string())
        })?;

        tracing::debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }
}
