pub mod filter;
pub mod product;
pub mod search;

pub use filter::*;
pub use product::*;
pub use search::*;
