//! Cache value types for catalog responses.
//!
//! Cart and order responses are intentionally absent: mutable state is
//! never cached.

use super::types::{Brand, Category, Product};

/// A cached catalog response.
#[derive(Clone)]
pub enum CacheValue {
    /// A product listing (the full catalog or one category's slice).
    Products(Vec<Product>),
    /// A single product by id.
    Product(Box<Product>),
    /// The category listing.
    Categories(Vec<Category>),
    /// The brand listing.
    Brands(Vec<Brand>),
}
