//! Catalog Filter Engine.
//!
//! A pure, synchronous pipeline over an already-fetched product list:
//! search, then color filter, then sort. Every stage is total. Empty or
//! absent inputs leave the list as it was, and the input slice is never
//! reordered; stages hand back references into it.
//!
//! ```rust
//! use acme_storefront::catalog::{FilterState, apply};
//!
//! let state = FilterState::from_query("q=hat&fcolor=red,blue&sort=price-asc");
//! let visible = apply(&[], &state);
//! assert!(visible.is_empty());
//! ```

mod color;
mod search;
mod sort;
mod state;

pub use color::{filter_by_colors, is_color_option};
pub use search::search;
pub use sort::{SortKey, min_price, sort};
pub use state::FilterState;

use crate::shopify::types::Product;

/// Run the full pipeline for a filter state.
#[must_use]
pub fn apply<'a>(products: &'a [Product], state: &FilterState) -> Vec<&'a Product> {
    let found = search(products, &state.query);
    let colored = filter_by_colors(found, state.colors.as_slice());
    sort(colored, state.sort_key())
}
