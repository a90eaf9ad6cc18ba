use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::Filter;
use crate::product::Product;

/// Request body for `POST /nlp-search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text shopping query. Missing or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Search result returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The filter that was actually applied.
    pub filters: Filter,
    /// Number of matching products.
    pub count: usize,
    /// Matching products in final order.
    pub results: Vec<Product>,
}

impl SearchResponse {
    pub fn new(filters: Filter, results: Vec<Product>) -> Self {
        Self {
            filters,
            count: results.len(),
            results,
        }
    }
}
