//! Mock completion and catalog sources for testing without upstream services.
//!
//! Both mocks record every call so tests can assert how many network
//! round-trips a request would have made.

use async_trait::async_trait;
use std::sync::Mutex;

use sq_protocol::{Product, Rating};

use crate::catalog::{CatalogError, CatalogResult, CatalogSource};
use crate::inference::{CompletionOptions, CompletionSource, InferenceError, InferenceResult};

/// Completion source that returns a canned reply (or error).
pub struct MockCompletion {
    reply: InferenceResult<String>,
    calls: Mutex<Vec<(String, CompletionOptions)>>,
}

impl MockCompletion {
    /// Always reply with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: InferenceError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(prompt, options)` pair received so far.
    pub fn calls(&self) -> Vec<(String, CompletionOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionSource for MockCompletion {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> InferenceResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Catalog source serving a fixed product list (or error).
pub struct MockCatalog {
    products: CatalogResult<Vec<Product>>,
    calls: Mutex<usize>,
}

impl MockCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Ok(products),
            calls: Mutex::new(0),
        }
    }

    /// Catalog pre-loaded with [`sample_products`].
    pub fn with_sample_data() -> Self {
        Self::new(sample_products())
    }

    /// Always fail with `error`.
    pub fn failing(error: CatalogError) -> Self {
        Self {
            products: Err(error),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn fetch_products(&self) -> CatalogResult<Vec<Product>> {
        *self.calls.lock().unwrap() += 1;
        self.products.clone()
    }
}

fn product(
    id: i64,
    title: &str,
    price: f64,
    description: &str,
    category: &str,
    rating: Option<(f64, u64)>,
) -> Product {
    Product {
        id,
        title: title.into(),
        price,
        description: description.into(),
        category: category.into(),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
        rating: rating.map(|(rate, count)| Rating { rate, count }),
    }
}

/// A small store catalog covering every category.
pub fn sample_products() -> Vec<Product> {
    vec![
        product(
            1,
            "Fjallraven Foldsack No. 1 Backpack",
            109.95,
            "Fits 15 inch laptops in the padded sleeve",
            "men's clothing",
            Some((3.9, 120)),
        ),
        product(
            2,
            "Mens Casual Slim Fit T-Shirt",
            22.3,
            "Slim-fitting style, lightweight cotton",
            "men's clothing",
            Some((4.1, 259)),
        ),
        product(
            3,
            "John Hardy Women's Chain Bracelet",
            695.0,
            "Silver dragon station chain bracelet",
            "jewelery",
            Some((4.6, 400)),
        ),
        product(
            4,
            "Solid Gold Petite Micropave Ring",
            168.0,
            "Satisfaction guaranteed",
            "jewelery",
            Some((3.9, 70)),
        ),
        product(
            5,
            "WD 2TB Elements Portable External Hard Drive",
            64.0,
            "USB 3.0 and USB 2.0 compatibility",
            "electronics",
            Some((3.3, 203)),
        ),
        product(
            6,
            "SanDisk SSD PLUS 1TB Internal SSD",
            109.0,
            "Easy upgrade for faster boot up",
            "electronics",
            Some((2.9, 470)),
        ),
        product(
            7,
            "Acer SB220Q 21.5 inch Full HD Monitor",
            599.0,
            "Ultra-thin IPS display",
            "electronics",
            None,
        ),
        product(
            8,
            "Women's Short Sleeve Moisture Tee",
            7.95,
            "Lightweight, breathable fabric",
            "women's clothing",
            Some((4.5, 146)),
        ),
        product(
            9,
            "Women's Rain Jacket Windbreaker",
            39.99,
            "Lightweight cotton-lined jacket with hood",
            "women's clothing",
            Some((3.8, 679)),
        ),
        product(
            10,
            "Women's Removable Hooded Faux Leather Moto Biker Jacket",
            29.95,
            "Faux leather material with hood",
            "women's clothing",
            Some((4.0, 340)),
        ),
    ]
}
