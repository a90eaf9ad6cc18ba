use serde::{Deserialize, Serialize};

/// Aggregate review score attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0.0 - 5.0.
    pub rate: f64,
    /// Number of reviews.
    pub count: u64,
}

/// A catalog product as served by the upstream store API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    /// One of the catalog's category names (e.g. "jewelery").
    pub category: String,
    /// Image URL.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Average rating, treating an unrated product as 0.
    pub fn rate(&self) -> f64 {
        self.rating.as_ref().map_or(0.0, |r| r.rate)
    }

    /// Lowercased text that keyword filters are matched against.
    pub fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.category).to_lowercase()
    }
}
