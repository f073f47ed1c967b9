//! Page-load catalog fetch.
//!
//! Fetches the product list the filter engine runs over, plus the collection
//! list for navigation. Both degrade to an empty list when the API fails.

use tracing::instrument;

use crate::config::CatalogConfig;
use crate::shopify::{Collection, CommerceApi, Product, ShopifyError};

/// Products for a collection page.
///
/// The root collection (or no collection) lists the whole catalog; any
/// other handle lists that collection. At most `page_size` products.
#[instrument(skip(api, settings))]
pub async fn load_products(
    api: &dyn CommerceApi,
    collection: Option<&str>,
    settings: &CatalogConfig,
) -> Vec<Product> {
    match try_load_products(api, collection, settings).await {
        Ok(products) => {
            tracing::debug!(count = products.len(), "Loaded products");
            products
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            Vec::new()
        }
    }
}

/// [`load_products`] without the fallback.
///
/// # Errors
///
/// Returns the API error, including [`ShopifyError::NotFound`] for an unknown
/// collection.
pub async fn try_load_products(
    api: &dyn CommerceApi,
    collection: Option<&str>,
    settings: &CatalogConfig,
) -> Result<Vec<Product>, ShopifyError> {
    match collection.map(str::trim).filter(|handle| !handle.is_empty()) {
        Some(handle) if handle != settings.root_collection => {
            api.get_collection_products(handle, settings.page_size).await
        }
        _ => api.get_products(settings.page_size, None).await,
    }
}

/// All collections, or none if the API fails.
#[instrument(skip(api))]
pub async fn load_collections(api: &dyn CommerceApi) -> Vec<Collection> {
    api.get_collections().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load collections");
        Vec::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use acme_core::{CartId, CartLineId};
    use async_trait::async_trait;

    use super::*;
    use crate::catalog::test_support::product;
    use crate::shopify::{
        CartLineInput, CartLineUpdateInput, CreatedCart, ShopifyCart,
    };

    /// Records catalog calls; cart calls are unreachable here.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
        failing: bool,
    }

    impl RecordingApi {
        fn record(&self, call: String) -> Result<(), ShopifyError> {
            self.calls.lock().unwrap().push(call);
            if self.failing {
                Err(ShopifyError::RateLimited(1))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CommerceApi for RecordingApi {
        async fn create_cart(&self) -> Result<CreatedCart, ShopifyError> {
            Err(ShopifyError::message("unused"))
        }

        async fn add_cart_lines(&self, _: &CartId, _: Vec<CartLineInput>) -> Result<(), ShopifyError> {
            Err(ShopifyError::message("unused"))
        }

        async fn update_cart_lines(
            &self,
            _: &CartId,
            _: Vec<CartLineUpdateInput>,
        ) -> Result<(), ShopifyError> {
            Err(ShopifyError::message("unused"))
        }

        async fn remove_cart_lines(&self, _: &CartId, _: Vec<CartLineId>) -> Result<(), ShopifyError> {
            Err(ShopifyError::message("unused"))
        }

        async fn get_cart(&self, _: &CartId) -> Result<Option<ShopifyCart>, ShopifyError> {
            Err(ShopifyError::message("unused"))
        }

        async fn get_products(
            &self,
            first: i64,
            query: Option<String>,
        ) -> Result<Vec<Product>, ShopifyError> {
            self.record(format!("products:{first}:{query:?}"))?;
            Ok(vec![product("Red Hat", "10", &["Red"])])
        }

        async fn get_collection_products(
            &self,
            handle: &str,
            first: i64,
        ) -> Result<Vec<Product>, ShopifyError> {
            self.record(format!("collection:{handle}:{first}"))?;
            Ok(vec![product("Blue Hat", "5", &["Blue"])])
        }

        async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
            self.record("collections".to_string())?;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_root_collection_lists_all_products() {
        let api = RecordingApi::default();
        let settings = CatalogConfig::default();

        load_products(&api, None, &settings).await;
        load_products(&api, Some("all"), &settings).await;
        load_products(&api, Some(" "), &settings).await;

        assert_eq!(
            *api.calls.lock().unwrap(),
            ["products:250:None", "products:250:None", "products:250:None"]
        );
    }

    #[tokio::test]
    async fn test_named_collection_lists_its_products() {
        let api = RecordingApi::default();
        let products = load_products(&api, Some("hats"), &CatalogConfig::default()).await;

        assert_eq!(products[0].title, "Blue Hat");
        assert_eq!(*api.calls.lock().unwrap(), ["collection:hats:250"]);
    }

    #[tokio::test]
    async fn test_custom_root_and_page_size() {
        let api = RecordingApi::default();
        let settings = CatalogConfig {
            root_collection: "everything".to_string(),
            page_size: 24,
        };

        load_products(&api, Some("everything"), &settings).await;
        load_products(&api, Some("all"), &settings).await;

        assert_eq!(
            *api.calls.lock().unwrap(),
            ["products:24:None", "collection:all:24"]
        );
    }

    #[tokio::test]
    async fn test_failures_yield_empty_lists() {
        let api = RecordingApi {
            failing: true,
            ..RecordingApi::default()
        };

        assert!(load_products(&api, None, &CatalogConfig::default()).await.is_empty());
        assert!(load_products(&api, Some("hats"), &CatalogConfig::default()).await.is_empty());
        assert!(load_collections(&api).await.is_empty());
        assert!(matches!(
            try_load_products(&api, None, &CatalogConfig::default()).await,
            Err(ShopifyError::RateLimited(1))
        ));
    }
}
