//! Catalog filter engine — predicate filtering plus stable sort.

use std::collections::HashSet;

use sq_protocol::{Filter, Product, SortKey};

/// Apply `filter` to `products` and return the matches in final order.
///
/// Every set field is an AND-ed predicate. Sorting is stable, so ties (and
/// `relevance`) keep the catalog's original order.
pub fn apply_filter(products: Vec<Product>, filter: &Filter) -> Vec<Product> {
    let categories: HashSet<String> = filter.categories.iter().map(|c| c.to_lowercase()).collect();
    let keywords: Vec<String> = filter.keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut out: Vec<Product> = products
        .into_iter()
        .filter(|p| filter.price_min.is_none_or(|min| p.price >= min))
        .filter(|p| filter.price_max.is_none_or(|max| p.price <= max))
        .filter(|p| filter.rating_min.is_none_or(|min| p.rate() >= min))
        .filter(|p| categories.is_empty() || categories.contains(&p.category.to_lowercase()))
        .filter(|p| {
            if keywords.is_empty() {
                return true;
            }
            let haystack = p.haystack();
            keywords.iter().all(|k| haystack.contains(k.as_str()))
        })
        .collect();

    sort_products(&mut out, filter.sort_by);
    out
}

/// Stable in-place sort by `key`.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::RatingDesc => products.sort_by(|a, b| b.rate().total_cmp(&a.rate())),
    }
}
