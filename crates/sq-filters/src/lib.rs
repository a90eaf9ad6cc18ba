//! Filter pipeline for ShopQuery.
//!
//! Turns loosely-structured search intent into a safe `Filter` and applies it
//! to a product list:
//! - **categories**: synonym-aware category normalization.
//! - **sort**: free-text sort hint sanitization.
//! - **price**: regex price-bound extraction from the raw query.
//! - **reconcile**: merging model and literal-text price bounds.
//! - **engine**: predicate filtering and stable sorting.

pub mod categories;
pub mod engine;
pub mod price;
pub mod reconcile;
pub mod sort;

pub use categories::{CategoryNormalizer, CategoryVocabulary};
pub use engine::apply_filter;
pub use price::{PriceBounds, extract_price_bounds};
pub use reconcile::reconcile_prices;
pub use sort::{SortHeuristics, SortSanitizer};
