//! Types for the Shopify Storefront API.
//!
//! Field names serialize in the API's camelCase so the same structs can be
//! read straight off a GraphQL response or written as mutation variables.
//! Catalog types ([`Product`], [`Collection`]) are flattened from the
//! connection/edge shape by the client; cart graph types ([`ShopifyCart`])
//! keep the nested shape and are normalized by the cart module.

use acme_core::{CartId, CartLineId, CollectionId, ProductId, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code, as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

// =============================================================================
// Image / SEO Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Image width in pixels.
    #[serde(default)]
    pub width: Option<i64>,
    /// Image height in pixels.
    #[serde(default)]
    pub height: Option<i64>,
}

/// SEO metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Connection Types
// =============================================================================

/// A GraphQL connection (`{ edges: [{ node }] }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    /// Edges in this page.
    pub edges: Vec<Edge<T>>,
}

/// A single connection edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The wrapped node.
    pub node: T,
}

impl<T> Connection<T> {
    /// Unwrap edges into their nodes, preserving order.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// A declared value of a product option.
///
/// Older payloads list values as bare strings; newer ones carry objects with
/// an identifier and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A bare value (e.g., `"Red"`).
    Plain(String),
    /// A value object (e.g., `{ "id": "gid://...", "name": "Red" }`).
    Named {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl OptionValue {
    /// The text to match and display: the plain value, else the name, else
    /// the identifier.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Plain(value) => Some(value),
            Self::Named { id, name } => name
                .as_deref()
                .filter(|n| !n.is_empty())
                .or(id.as_deref()),
        }
    }
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Option name (e.g., "Color").
    pub name: String,
    /// Declared values.
    #[serde(default)]
    pub values: Vec<OptionValue>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (combination of option values).
    #[serde(default)]
    pub title: String,
    /// Whether this variant is available for sale.
    #[serde(default)]
    pub available_for_sale: bool,
    /// Current price.
    #[serde(default)]
    pub price: Option<Money>,
    /// Selected options for this variant.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

/// A product in the catalog.
///
/// Read-only from the storefront's point of view: listed, searched, filtered
/// and sorted, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    #[serde(default)]
    pub handle: String,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Plain text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether any variant is available.
    #[serde(default)]
    pub available_for_sale: bool,
    /// Price range across variants.
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    /// Featured image.
    #[serde(default)]
    pub featured_image: Option<Image>,
    /// All product images.
    #[serde(default)]
    pub images: Vec<Image>,
    /// Product options.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Product variants.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
}

// =============================================================================
// Cart Graph Types
// =============================================================================

/// A cart as the API returns it: nested connections, string amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCart {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL.
    pub checkout_url: String,
    /// Quantity total as reported remotely (not trusted).
    #[serde(default)]
    pub total_quantity: Option<i64>,
    /// Cart cost summary.
    pub cost: ShopifyCartCost,
    /// Cart lines.
    #[serde(default)]
    pub lines: Connection<ShopifyCartLine>,
}

/// Cart cost summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartCost {
    /// Subtotal before tax/shipping.
    pub subtotal_amount: Money,
    /// Total amount.
    pub total_amount: Money,
    /// Total tax amount (nullable, deprecated upstream).
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

/// A line item in the remote cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartLine {
    /// Cart line ID.
    pub id: CartLineId,
    /// Quantity.
    pub quantity: i64,
    /// Line cost as reported remotely (not trusted).
    #[serde(default)]
    pub cost: Option<ShopifyCartLineCost>,
    /// Product variant.
    pub merchandise: ShopifyMerchandise,
}

/// Cost for a remote cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartLineCost {
    /// Total (after discounts).
    pub total_amount: Money,
}

/// Merchandise in a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    #[serde(default)]
    pub title: String,
    /// Selected options.
    #[serde(default)]
    pub selected_options: Option<Vec<SelectedOption>>,
    /// Unit price.
    pub price: Money,
    /// Parent product info.
    pub product: ShopifyMerchandiseProduct,
}

/// Parent product info for cart merchandise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyMerchandiseProduct {
    /// Product ID.
    pub id: ProductId,
    /// Product handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Product images.
    #[serde(default)]
    pub images: Option<Connection<Image>>,
}

/// The acknowledgement returned by cart creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCart {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL.
    pub checkout_url: String,
}

// =============================================================================
// Cart Inputs
// =============================================================================

/// Input for adding a line to cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: VariantId,
    /// Quantity to add.
    pub quantity: i64,
}

impl CartLineInput {
    /// One unit of a variant.
    #[must_use]
    pub const fn single(merchandise_id: VariantId) -> Self {
        Self {
            merchandise_id,
            quantity: 1,
        }
    }
}

/// Input for updating a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineUpdateInput {
    /// Cart line ID.
    pub id: CartLineId,
    /// New absolute quantity.
    pub quantity: i64,
}

/// User error from cart mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUserError {
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Field path that caused the error.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable error message.
    pub message: String,
}
