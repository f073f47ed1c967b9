//! The remote commerce API contract.

use acme_core::{CartId, CartLineId};
use async_trait::async_trait;

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    CartLineInput, CartLineUpdateInput, Collection, CreatedCart, Product, ShopifyCart,
};

/// Operations the storefront consumes from the remote commerce service.
///
/// Mutations only acknowledge; callers re-fetch the cart to observe the
/// result. Implemented over HTTP by
/// [`StorefrontClient`](crate::shopify::StorefrontClient).
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Create an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports user errors.
    async fn create_cart(&self) -> Result<CreatedCart, ShopifyError>;

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports user errors.
    async fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<(), ShopifyError>;

    /// Set absolute quantities on existing lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports user errors.
    async fn update_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<(), ShopifyError>;

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports user errors.
    async fn remove_cart_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<(), ShopifyError>;

    /// Fetch a cart. `Ok(None)` when the cart has expired or never existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_cart(&self, cart_id: &CartId) -> Result<Option<ShopifyCart>, ShopifyError>;

    /// Fetch up to `first` products, optionally narrowed by a search query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_products(
        &self,
        first: i64,
        query: Option<String>,
    ) -> Result<Vec<Product>, ShopifyError>;

    /// Fetch up to `first` products of the collection with `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] for an unknown collection, or an
    /// error if the request fails.
    async fn get_collection_products(
        &self,
        handle: &str,
        first: i64,
    ) -> Result<Vec<Product>, ShopifyError>;

    /// Fetch all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError>;
}
