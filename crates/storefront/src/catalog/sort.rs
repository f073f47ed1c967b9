//! Product ordering.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::shopify::types::Product;

/// Sort order selected by the `sort` URL parameter.
///
/// `Newest` and `Oldest` order by title (descending and ascending). Products
/// carry no creation date, so title order stands in for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
}

impl SortKey {
    /// All recognized keys, in menu order.
    pub const ALL: [Self; 4] = [Self::PriceAsc, Self::PriceDesc, Self::Newest, Self::Oldest];

    /// Parse from URL parameter value. Unrecognized values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

/// Minimum variant price; missing or unparseable prices count as zero.
#[must_use]
pub fn min_price(product: &Product) -> Decimal {
    product
        .price_range
        .as_ref()
        .and_then(|range| Decimal::from_str(range.min_variant_price.amount.trim()).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Order products by `key`, or keep them as they are without one.
///
/// The sort is stable, so equal products keep their relative order.
pub fn sort<'a>(mut products: Vec<&'a Product>, key: Option<SortKey>) -> Vec<&'a Product> {
    match key {
        None => {}
        Some(SortKey::PriceAsc) => products.sort_by_key(|p| min_price(p)),
        Some(SortKey::PriceDesc) => products.sort_by(|a, b| min_price(b).cmp(&min_price(a))),
        Some(SortKey::Newest) => products.sort_by(|a, b| compare_titles(b, a)),
        Some(SortKey::Oldest) => products.sort_by(|a, b| compare_titles(a, b)),
    }
    products
}

/// Case-insensitive title order, falling back to exact order on ties.
fn compare_titles(a: &Product, b: &Product) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}
