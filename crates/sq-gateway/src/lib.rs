//! ShopQuery gateway — library crate for the natural-language search server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `sq-e2e-tests`) can access `AppState`, `build_router`, and the
//! completion/catalog sources.

pub mod catalog;
pub mod config;
pub mod error;
pub mod inference;
pub mod mock;
pub mod routes;
pub mod state;
