//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client`'s request/response envelope with `reqwest` for HTTP.
//! Caches products and collections using `moka` (5-minute TTL).

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use acme_core::{CartId, CartLineId};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    CartLineInput, CartLineUpdateInput, CartUserError, Collection, CreatedCart, Product,
    ShopifyCart,
};
use crate::shopify::{CommerceApi, GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::convert_products;
use queries::{
    AddCartLines, CartMutationPayload, CreateCart, GetCart, GetCollectionProducts,
    GetCollections, GetProducts, RemoveCartLines, UpdateCartLines, add_cart_lines, create_cart,
    get_cart, get_collection_products, get_collections, get_products, remove_cart_lines,
    update_cart_lines,
};

/// Header for private (server-side) access tokens.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Header for public (browser-safe) access tokens.
const PUBLIC_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Collections fetched for navigation.
const COLLECTIONS_PAGE_SIZE: i64 = 100;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides access to products, collections, and cart operations.
/// Products and collections are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    token_header: &'static str,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// The private token is used when configured; otherwise the public one.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let (token_header, access_token) = config.storefront_private_token.as_ref().map_or_else(
            || {
                (
                    PUBLIC_TOKEN_HEADER,
                    config.storefront_public_token.clone(),
                )
            },
            |private| (PRIVATE_TOKEN_HEADER, private.expose_secret().to_string()),
        );

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                token_header,
                access_token,
                cache,
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(self.inner.token_header, &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

fn convert_graphql_error(e: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: e.message,
        locations: e.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: e.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

/// Join mutation user errors into a single `UserError`.
fn user_errors(errors: Vec<CartUserError>) -> ShopifyError {
    ShopifyError::UserError(
        errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Check a cart line mutation payload: user errors first, then the cart ack.
fn check_mutation(
    payload: Option<CartMutationPayload>,
    failure: &str,
) -> Result<(), ShopifyError> {
    let Some(result) = payload else {
        return Err(ShopifyError::message(failure));
    };

    if !result.user_errors.is_empty() {
        return Err(user_errors(result.user_errors));
    }

    match result.cart {
        Some(cart) => {
            debug!(cart_id = %cart.id, "Cart mutation acknowledged");
            Ok(())
        }
        None => Err(ShopifyError::message(failure)),
    }
}

#[async_trait]
impl CommerceApi for StorefrontClient {
    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    #[instrument(skip(self))]
    async fn create_cart(&self) -> Result<CreatedCart, ShopifyError> {
        let data = self
            .execute::<CreateCart>(create_cart::Variables::default())
            .await?;

        if let Some(result) = data.cart_create {
            if !result.user_errors.is_empty() {
                return Err(user_errors(result.user_errors));
            }

            if let Some(cart) = result.cart {
                return Ok(cart);
            }
        }

        Err(ShopifyError::message("Failed to create cart"))
    }

    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    async fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<(), ShopifyError> {
        let variables = add_cart_lines::Variables {
            cart_id: cart_id.clone(),
            lines,
        };

        let data = self.execute::<AddCartLines>(variables).await?;
        check_mutation(data.cart_lines_add, "Failed to add to cart")
    }

    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    async fn update_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<(), ShopifyError> {
        let variables = update_cart_lines::Variables {
            cart_id: cart_id.clone(),
            lines,
        };

        let data = self.execute::<UpdateCartLines>(variables).await?;
        check_mutation(data.cart_lines_update, "Failed to update cart")
    }

    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    async fn remove_cart_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<(), ShopifyError> {
        let variables = remove_cart_lines::Variables {
            cart_id: cart_id.clone(),
            line_ids,
        };

        let data = self.execute::<RemoveCartLines>(variables).await?;
        check_mutation(data.cart_lines_remove, "Failed to remove from cart")
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn get_cart(&self, cart_id: &CartId) -> Result<Option<ShopifyCart>, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.clone(),
        };

        let data = self.execute::<GetCart>(variables).await?;
        Ok(data.cart)
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    #[instrument(skip(self))]
    async fn get_products(
        &self,
        first: i64,
        query: Option<String>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let cache_key = CacheKey::Products {
            first,
            query: query.clone(),
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data = self
            .execute::<GetProducts>(get_products::Variables { first, query })
            .await?;

        let products = convert_products(data.products);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(handle = %handle))]
    async fn get_collection_products(
        &self,
        handle: &str,
        first: i64,
    ) -> Result<Vec<Product>, ShopifyError> {
        let cache_key = CacheKey::CollectionProducts {
            handle: handle.to_string(),
            first,
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection products");
            return Ok(products);
        }

        let variables = get_collection_products::Variables {
            handle: handle.to_string(),
            first,
        };

        let data = self.execute::<GetCollectionProducts>(variables).await?;

        let collection = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        let products = convert_products(collection.products);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
        if let Some(CacheValue::Collections(collections)) =
            self.inner.cache.get(&CacheKey::Collections).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data = self
            .execute::<GetCollections>(get_collections::Variables {
                first: COLLECTIONS_PAGE_SIZE,
            })
            .await?;

        let collections = data.collections.into_nodes();

        self.inner
            .cache
            .insert(
                CacheKey::Collections,
                CacheValue::Collections(collections.clone()),
            )
            .await;

        Ok(collections)
    }
}
