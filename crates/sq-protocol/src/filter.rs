use serde::{Deserialize, Serialize};

/// Highest value accepted for `rating_min`.
pub const MAX_RATING: f64 = 5.0;

/// Result ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Keep the catalog's own order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortKey {
    /// Every allowed sort key, in wire order.
    pub const ALL: [SortKey; 4] = [
        SortKey::Relevance,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingDesc,
    ];

    /// Wire name (e.g. `"price_asc"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::RatingDesc => "rating_desc",
        }
    }

    /// Match an exact wire name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical structured search intent.
///
/// `sort_by` can only hold one of the four [`SortKey`] values, so any
/// free-text hint must be sanitized before a `Filter` is built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Catalog category names; empty means no category restriction.
    pub categories: Vec<String>,
    /// Lowercase substrings that must all appear in a product's text.
    pub keywords: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Minimum rating in `[0, 5]`.
    pub rating_min: Option<f64>,
    pub sort_by: SortKey,
}

impl Filter {
    /// Build a filter from already-sanitized parts.
    ///
    /// Keywords are trimmed and lowercased (empty ones dropped), negative or
    /// non-finite prices are discarded and `rating_min` is clamped to `[0, 5]`.
    pub fn new(
        categories: Vec<String>,
        keywords: Vec<String>,
        price_min: Option<f64>,
        price_max: Option<f64>,
        rating_min: Option<f64>,
        sort_by: SortKey,
    ) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            categories,
            keywords,
            price_min: price_min.filter(|p| p.is_finite() && *p >= 0.0),
            price_max: price_max.filter(|p| p.is_finite() && *p >= 0.0),
            rating_min: rating_min
                .filter(|r| r.is_finite())
                .map(|r| r.clamp(0.0, MAX_RATING)),
            sort_by,
        }
    }

    /// True when both bounds are set and out of order.
    pub fn has_inverted_price_range(&self) -> bool {
        matches!((self.price_min, self.price_max), (Some(lo), Some(hi)) if lo > hi)
    }
}
