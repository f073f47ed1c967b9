//! Cache types for Storefront API responses.

use crate::shopify::types::{Collection, Product};

/// Cache key for catalog reads. Carts are never cached.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products { first: i64, query: Option<String> },
    CollectionProducts { handle: String, first: i64 },
    Collections,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Collections(Vec<Collection>),
}
