//! Cart Manager.
//!
//! Owns the client-side cart identifier and mediates every cart mutation
//! against the remote [`CommerceApi`]. Shopify is the source of truth: each
//! mutation is followed by a fresh fetch, and the result is normalized into
//! a flat [`Cart`].
//!
//! Public operations are fail-soft. They log the failure and return `None`
//! so the cart UI stays usable when the API is down. Each has a `try_*`
//! sibling that returns the [`CartError`] instead.
//!
//! # Concurrency
//!
//! Operations take `&self` and hold no lock across the remote calls. Two
//! overlapping mutations on the same cart each run their own
//! mutate-then-fetch cycle, and the remote service decides how conflicting
//! writes resolve. Likewise two concurrent [`CartManager::get_or_create_cart_id`]
//! calls on an empty store can each create a cart; the last identifier
//! written wins.

mod error;
mod normalize;
pub mod store;
mod types;

use std::sync::Arc;

use acme_core::{CartId, CartLineId, VariantId};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::shopify::{CartLineInput, CartLineUpdateInput, CommerceApi, CreatedCart};

pub use error::CartError;
pub use normalize::normalize_cart;
pub use store::{
    CART_ID_KEY, CartIdStore, FileCartIdStore, MemoryCartIdStore, StoreError, StoredEntry,
    cart_id_ttl,
};
pub use types::{Cart, CartCost, CartItem, Merchandise, MerchandiseProduct, ProductPriceRange};

/// Cart operations for one client, identified by the entry in its store.
#[derive(Clone)]
pub struct CartManager {
    api: Arc<dyn CommerceApi>,
    store: Arc<dyn CartIdStore>,
}

impl CartManager {
    #[must_use]
    pub fn new(api: Arc<dyn CommerceApi>, store: Arc<dyn CartIdStore>) -> Self {
        Self { api, store }
    }

    /// The persisted cart identifier, if one is live.
    ///
    /// A blank stored value reads as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the store cannot be read.
    pub fn stored_cart_id(&self) -> Result<Option<CartId>, CartError> {
        Ok(self
            .store
            .get(CART_ID_KEY)?
            .and_then(|entry| CartId::parse(&entry.value)))
    }

    /// The persisted cart identifier entry, for rendering as a cookie.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the store cannot be read.
    pub fn stored_entry(&self) -> Result<Option<StoredEntry>, CartError> {
        Ok(self.store.get(CART_ID_KEY)?)
    }

    /// Forget the persisted cart identifier. The remote cart is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the store cannot be written.
    pub fn forget(&self) -> Result<(), CartError> {
        self.store.expire(CART_ID_KEY)?;
        Ok(())
    }

    fn persist(&self, cart_id: &CartId) -> Result<(), CartError> {
        self.store
            .set(CART_ID_KEY, cart_id.as_str(), cart_id_ttl())?;
        Ok(())
    }

    async fn fetch(&self, cart_id: &CartId) -> Result<Cart, CartError> {
        let remote = self
            .api
            .get_cart(cart_id)
            .await?
            .ok_or_else(|| CartError::NotFound(cart_id.to_string()))?;
        normalize_cart(remote)
    }

    // =========================================================================
    // Result-returning operations
    // =========================================================================

    /// Return the persisted cart identifier, creating a remote cart and
    /// persisting its identifier when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the cart cannot be created.
    #[instrument(skip(self))]
    pub async fn try_get_or_create_cart_id(&self) -> Result<CartId, CartError> {
        if let Some(cart_id) = self.stored_cart_id()? {
            return Ok(cart_id);
        }

        let created = self.api.create_cart().await?;
        self.persist(&created.id)?;
        tracing::info!(cart_id = %created.id, "Created cart");
        Ok(created.id)
    }

    /// Add one unit of a variant and return the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] without any remote call when the
    /// variant identifier is missing or blank.
    #[instrument(skip(self))]
    pub async fn try_add_item(&self, variant_id: Option<&str>) -> Result<Cart, CartError> {
        let variant_id = variant_id
            .and_then(VariantId::parse)
            .ok_or_else(|| CartError::InvalidInput("missing variant identifier".to_string()))?;

        let cart_id = self.try_get_or_create_cart_id().await?;
        self.api
            .add_cart_lines(&cart_id, vec![CartLineInput::single(variant_id.clone())])
            .await?;

        add_breadcrumb(
            "cart",
            "Added item to cart",
            Some(&[
                ("cart_id", cart_id.as_str()),
                ("variant_id", variant_id.as_str()),
            ]),
        );

        self.fetch(&cart_id).await
    }

    /// Set a line's quantity and return the refreshed cart. A quantity of
    /// zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] when no cart identifier is
    /// persisted or the line identifier is blank.
    #[instrument(skip(self))]
    pub async fn try_update_item(&self, line_id: &str, quantity: u32) -> Result<Cart, CartError> {
        let cart_id = self
            .stored_cart_id()?
            .ok_or_else(|| CartError::InvalidInput("no cart identifier".to_string()))?;
        let line_id = CartLineId::parse(line_id)
            .ok_or_else(|| CartError::InvalidInput("missing line identifier".to_string()))?;

        if quantity == 0 {
            self.api
                .remove_cart_lines(&cart_id, vec![line_id.clone()])
                .await?;
        } else {
            self.api
                .update_cart_lines(
                    &cart_id,
                    vec![CartLineUpdateInput {
                        id: line_id.clone(),
                        quantity: i64::from(quantity),
                    }],
                )
                .await?;
        }

        let quantity = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Updated cart line",
            Some(&[
                ("cart_id", cart_id.as_str()),
                ("line_id", line_id.as_str()),
                ("quantity", quantity.as_str()),
            ]),
        );

        self.fetch(&cart_id).await
    }

    /// Fetch the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] when no cart identifier is
    /// persisted and [`CartError::NotFound`] when the remote cart is gone.
    #[instrument(skip(self))]
    pub async fn try_get_cart(&self) -> Result<Cart, CartError> {
        let cart_id = self
            .stored_cart_id()?
            .ok_or_else(|| CartError::InvalidInput("no cart identifier".to_string()))?;
        self.fetch(&cart_id).await
    }

    /// Create a new remote cart and persist its identifier, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be created or persisted.
    #[instrument(skip(self))]
    pub async fn try_create_cart_and_set_cookie(&self) -> Result<CreatedCart, CartError> {
        let created = self.api.create_cart().await?;
        self.persist(&created.id)?;
        tracing::info!(cart_id = %created.id, "Created cart");
        Ok(created)
    }

    // =========================================================================
    // Fail-soft operations
    // =========================================================================

    /// See [`CartManager::try_get_or_create_cart_id`]. `None` on failure.
    pub async fn get_or_create_cart_id(&self) -> Option<CartId> {
        collapse("get_or_create_cart_id", self.try_get_or_create_cart_id().await)
    }

    /// See [`CartManager::try_add_item`]. `None` on failure, including a
    /// missing variant identifier.
    pub async fn add_item(&self, variant_id: Option<&str>) -> Option<Cart> {
        collapse("add_item", self.try_add_item(variant_id).await)
    }

    /// See [`CartManager::try_update_item`]. `None` on failure.
    pub async fn update_item(&self, line_id: &str, quantity: u32) -> Option<Cart> {
        collapse("update_item", self.try_update_item(line_id, quantity).await)
    }

    /// See [`CartManager::try_get_cart`]. `None` when there is no cart.
    pub async fn get_cart(&self) -> Option<Cart> {
        collapse("get_cart", self.try_get_cart().await)
    }

    /// See [`CartManager::try_create_cart_and_set_cookie`]. `None` on failure.
    pub async fn create_cart_and_set_cookie(&self) -> Option<CreatedCart> {
        collapse(
            "create_cart_and_set_cookie",
            self.try_create_cart_and_set_cookie().await,
        )
    }
}

fn collapse<T>(operation: &'static str, result: Result<T, CartError>) -> Option<T> {
    result.map_err(|e| e.log(operation)).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::shopify::types::{
        Collection, Connection, Edge, Money, Product, ShopifyCart, ShopifyCartCost,
        ShopifyCartLine, ShopifyMerchandise, ShopifyMerchandiseProduct,
    };
    use crate::shopify::ShopifyError;

    /// In-memory commerce API with call counters.
    #[derive(Default)]
    struct FakeApi {
        carts: Mutex<HashMap<CartId, Vec<(CartLineId, VariantId, i64)>>>,
        next_id: AtomicUsize,
        creates: AtomicUsize,
        adds: AtomicUsize,
        updates: AtomicUsize,
        removes: AtomicUsize,
        fetches: AtomicUsize,
        failing: AtomicBool,
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.creates.load(Ordering::SeqCst)
                + self.adds.load(Ordering::SeqCst)
                + self.updates.load(Ordering::SeqCst)
                + self.removes.load(Ordering::SeqCst)
                + self.fetches.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), ShopifyError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ShopifyError::message("upstream unavailable"));
            }
            Ok(())
        }

        fn money(amount: &str) -> Money {
            Money {
                amount: amount.to_string(),
                currency_code: "USD".to_string(),
            }
        }
    }

    #[async_trait]
    impl CommerceApi for FakeApi {
        async fn create_cart(&self) -> Result<CreatedCart, ShopifyError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            let id = CartId::new(format!("gid://shopify/Cart/{n}"));
            self.carts.lock().unwrap().insert(id.clone(), Vec::new());
            Ok(CreatedCart {
                id,
                checkout_url: format!("https://shop.example/checkout/{n}"),
            })
        }

        async fn add_cart_lines(
            &self,
            cart_id: &CartId,
            lines: Vec<CartLineInput>,
        ) -> Result<(), ShopifyError> {
            self.adds.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let mut carts = self.carts.lock().unwrap();
            let cart = carts
                .get_mut(cart_id)
                .ok_or_else(|| ShopifyError::UserError("The specified cart does not exist.".into()))?;
            for input in lines {
                if let Some(existing) = cart.iter_mut().find(|(_, v, _)| *v == input.merchandise_id) {
                    existing.2 += input.quantity;
                } else {
                    let line_id = CartLineId::new(format!("L{}", cart.len() + 1));
                    cart.push((line_id, input.merchandise_id, input.quantity));
                }
            }
            Ok(())
        }

        async fn update_cart_lines(
            &self,
            cart_id: &CartId,
            lines: Vec<CartLineUpdateInput>,
        ) -> Result<(), ShopifyError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let mut carts = self.carts.lock().unwrap();
            let cart = carts.get_mut(cart_id).unwrap();
            for input in lines {
                let line = cart
                    .iter_mut()
                    .find(|(id, _, _)| *id == input.id)
                    .ok_or_else(|| ShopifyError::UserError("line not found".into()))?;
                line.2 = input.quantity;
            }
            Ok(())
        }

        async fn remove_cart_lines(
            &self,
            cart_id: &CartId,
            line_ids: Vec<CartLineId>,
        ) -> Result<(), ShopifyError> {
            self.removes.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let mut carts = self.carts.lock().unwrap();
            let cart = carts.get_mut(cart_id).unwrap();
            cart.retain(|(id, _, _)| !line_ids.contains(id));
            Ok(())
        }

        async fn get_cart(&self, cart_id: &CartId) -> Result<Option<ShopifyCart>, ShopifyError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let carts = self.carts.lock().unwrap();
            Ok(carts.get(cart_id).map(|lines| ShopifyCart {
                id: cart_id.clone(),
                checkout_url: "https://shop.example/checkout".to_string(),
                total_quantity: Some(-1),
                cost: ShopifyCartCost {
                    subtotal_amount: Self::money("0"),
                    total_amount: Self::money("0"),
                    total_tax_amount: None,
                },
                lines: Connection {
                    edges: lines
                        .iter()
                        .map(|(line_id, variant_id, quantity)| Edge {
                            node: ShopifyCartLine {
                                id: line_id.clone(),
                                quantity: *quantity,
                                cost: None,
                                merchandise: ShopifyMerchandise {
                                    id: variant_id.clone(),
                                    title: "Default Title".to_string(),
                                    selected_options: None,
                                    price: Self::money("12.50"),
                                    product: ShopifyMerchandiseProduct {
                                        id: acme_core::ProductId::new("gid://shopify/Product/1"),
                                        handle: "red-hat".to_string(),
                                        title: "Red Hat".to_string(),
                                        images: None,
                                    },
                                },
                            },
                        })
                        .collect(),
                },
            }))
        }

        async fn get_products(
            &self,
            _first: i64,
            _query: Option<String>,
        ) -> Result<Vec<Product>, ShopifyError> {
            Ok(Vec::new())
        }

        async fn get_collection_products(
            &self,
            _handle: &str,
            _first: i64,
        ) -> Result<Vec<Product>, ShopifyError> {
            Ok(Vec::new())
        }

        async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
            Ok(Vec::new())
        }
    }

    fn manager() -> (CartManager, Arc<FakeApi>, Arc<MemoryCartIdStore>) {
        let api = Arc::new(FakeApi::default());
        let store = Arc::new(MemoryCartIdStore::new());
        (CartManager::new(api.clone(), store.clone()), api, store)
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (manager, api, _) = manager();

        let first = manager.get_or_create_cart_id().await.unwrap();
        let second = manager.get_or_create_cart_id().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_persists_identifier() {
        let (manager, _, store) = manager();
        let cart_id = manager.get_or_create_cart_id().await.unwrap();

        let entry = store.get(CART_ID_KEY).unwrap().unwrap();
        assert_eq!(entry.value, cart_id.as_str());
        assert_eq!(entry.path, "/");
    }

    #[tokio::test]
    async fn test_add_item_without_variant_makes_no_remote_call() {
        let (manager, api, store) = manager();

        assert!(manager.add_item(None).await.is_none());
        assert!(manager.add_item(Some("  ")).await.is_none());

        assert_eq!(api.calls(), 0);
        assert!(store.get(CART_ID_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_item_creates_cart_and_returns_it() {
        let (manager, api, _) = manager();

        let cart = manager
            .add_item(Some("gid://shopify/ProductVariant/1"))
            .await
            .unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(api.adds.load(Ordering::SeqCst), 1);

        let cart = manager
            .add_item(Some("gid://shopify/ProductVariant/1"))
            .await
            .unwrap();
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(
            Some(cart.lines[0].cost.clone()),
            cart.lines[0].merchandise.unit_price.times(2)
        );
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_item_zero_removes_line() {
        let (manager, api, _) = manager();
        manager.add_item(Some("gid://shopify/ProductVariant/1")).await.unwrap();
        manager.add_item(Some("gid://shopify/ProductVariant/2")).await.unwrap();

        let cart = manager.update_item("L1", 0).await.unwrap();

        assert!(cart.line(&CartLineId::new("L1")).is_none());
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(api.removes.load(Ordering::SeqCst), 1);
        assert_eq!(api.updates.load(Ordering::SeqCst), 0);

        let refetched = manager.get_cart().await.unwrap();
        assert!(refetched.line(&CartLineId::new("L1")).is_none());
    }

    #[tokio::test]
    async fn test_update_item_sets_absolute_quantity() {
        let (manager, api, _) = manager();
        manager.add_item(Some("gid://shopify/ProductVariant/1")).await.unwrap();

        let cart = manager.update_item("L1", 4).await.unwrap();

        assert_eq!(cart.lines[0].quantity, 4);
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(api.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_item_without_cart_returns_none() {
        let (manager, api, _) = manager();
        assert!(manager.update_item("L1", 2).await.is_none());
        assert!(matches!(
            manager.try_update_item("L1", 2).await,
            Err(CartError::InvalidInput(_))
        ));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_cart_without_identifier_is_none() {
        let (manager, api, _) = manager();
        assert!(manager.get_cart().await.is_none());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_cart_expired_remotely_is_not_found() {
        let (manager, api, store) = manager();
        store
            .set(CART_ID_KEY, "gid://shopify/Cart/gone", cart_id_ttl())
            .unwrap();

        assert!(matches!(
            manager.try_get_cart().await,
            Err(CartError::NotFound(_))
        ));
        assert!(manager.get_cart().await.is_none());
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_remote_failure_is_fail_soft() {
        let (manager, api, _) = manager();
        manager.add_item(Some("gid://shopify/ProductVariant/1")).await.unwrap();
        api.failing.store(true, Ordering::SeqCst);

        assert!(manager.add_item(Some("gid://shopify/ProductVariant/1")).await.is_none());
        assert!(manager.update_item("L1", 3).await.is_none());
        assert!(manager.get_cart().await.is_none());
        assert!(manager.create_cart_and_set_cookie().await.is_none());
        assert!(matches!(
            manager.try_get_cart().await,
            Err(CartError::Remote(_))
        ));

        api.failing.store(false, Ordering::SeqCst);
        let cart = manager.get_cart().await.unwrap();
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_create_cart_replaces_identifier() {
        let (manager, api, _) = manager();
        let first = manager.get_or_create_cart_id().await.unwrap();

        let created = manager.create_cart_and_set_cookie().await.unwrap();

        assert_ne!(first, created.id);
        assert_eq!(manager.stored_cart_id().unwrap(), Some(created.id));
        assert_eq!(api.creates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forget_clears_identifier() {
        let (manager, _, _) = manager();
        manager.get_or_create_cart_id().await.unwrap();
        manager.forget().unwrap();
        assert!(manager.stored_cart_id().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_identifier_surfaces_invalid_input_on_add() {
        let (manager, api, store) = manager();
        store
            .set(CART_ID_KEY, "gid://shopify/Cart/expired", cart_id_ttl())
            .unwrap();

        assert!(matches!(
            manager.try_add_item(Some("gid://shopify/ProductVariant/1")).await,
            Err(CartError::InvalidInput(_))
        ));
        assert_eq!(api.creates.load(Ordering::SeqCst), 0);
    }
}
