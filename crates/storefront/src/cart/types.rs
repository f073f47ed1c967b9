//! Normalized cart types.
//!
//! These are the flat shapes handed to callers. They are built from the
//! remote cart graph by [`normalize_cart`](crate::cart::normalize_cart) and
//! never deserialized from the wire.

use acme_core::{CartId, CartLineId, Price, ProductId, VariantId};
use serde::{Serialize, Serializer};

use crate::shopify::types::{Image, SelectedOption};

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub checkout_url: String,
    pub cost: CartCost,
    pub lines: Vec<CartItem>,
}

impl Cart {
    /// Sum of line quantities. Always recomputed from the lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find a line by its identifier.
    #[must_use]
    pub fn line(&self, line_id: &CartLineId) -> Option<&CartItem> {
        self.lines.iter().find(|line| &line.id == line_id)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct CartRepr<'a> {
            id: &'a CartId,
            checkout_url: &'a str,
            cost: &'a CartCost,
            total_quantity: u64,
            lines: &'a [CartItem],
        }

        CartRepr {
            id: &self.id,
            checkout_url: &self.checkout_url,
            cost: &self.cost,
            total_quantity: self.total_quantity(),
            lines: &self.lines,
        }
        .serialize(serializer)
    }
}

/// Cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Price,
    pub total_amount: Price,
    /// Zero when the remote cart reports no tax.
    pub total_tax_amount: Price,
}

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartLineId,
    /// Always at least 1.
    pub quantity: u32,
    /// Unit price times quantity.
    pub cost: Price,
    pub merchandise: Merchandise,
}

/// The variant a line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    pub id: VariantId,
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub unit_price: Price,
    pub product: MerchandiseProduct,
}

/// Display snapshot of the variant's parent product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseProduct {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub price_range: ProductPriceRange,
}

/// Price range of the parent product as seen from the cart line.
///
/// Only the line's variant is known, so both ends are its unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceRange {
    pub min_variant_price: Price,
    pub max_variant_price: Price,
}
