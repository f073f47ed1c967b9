//! Catalog commands: filtered product listing and collections.
//!
//! # Usage
//!
//! ```bash
//! # Everything, cheapest first
//! acme catalog --sort price-asc
//!
//! # A shared filter URL's query string
//! acme catalog --collection hats --filter 'q=wool&fcolor=red,navy'
//! ```

use acme_storefront::catalog::{self, FilterState};
use acme_storefront::config::CatalogConfig;
use acme_storefront::error::Result;
use acme_storefront::listing;
use acme_storefront::shopify::{CommerceApi, Product};

/// Filter options from the command line. Flags override `--filter`.
pub struct CatalogArgs {
    pub collection: Option<String>,
    pub filter: Option<String>,
    pub query: Option<String>,
    pub colors: Vec<String>,
    pub sort: Option<String>,
    pub json: bool,
}

impl CatalogArgs {
    fn filter_state(&self) -> FilterState {
        let mut state = self
            .filter
            .as_deref()
            .map(FilterState::from_query)
            .unwrap_or_default();

        if let Some(query) = &self.query {
            state.query.clone_from(query);
        }
        if !self.colors.is_empty() {
            state.colors.clone_from(&self.colors);
        }
        if let Some(sort) = &self.sort {
            state.sort = Some(sort.clone());
        }
        state
    }
}

/// Load a collection page and print the filtered view.
pub async fn list(api: &dyn CommerceApi, settings: &CatalogConfig, args: &CatalogArgs) -> Result<()> {
    let state = args.filter_state();
    if state.sort.is_some() && state.sort_key().is_none() {
        tracing::warn!(sort = ?state.sort, "Unrecognized sort key, keeping catalog order");
    }

    let products = listing::load_products(api, args.collection.as_deref(), settings).await;
    let visible = catalog::apply(&products, &state);
    tracing::info!(
        total = products.len(),
        shown = visible.len(),
        filter = %state.to_query(),
        "Filtered catalog"
    );

    let output = if args.json {
        serde_json::to_string_pretty(&visible)?
    } else {
        visible.iter().map(|p| render(p)).collect::<Vec<_>>().join("\n")
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// Print all collections.
pub async fn collections(api: &dyn CommerceApi, json: bool) -> Result<()> {
    let collections = listing::load_collections(api).await;

    let output = if json {
        serde_json::to_string_pretty(&collections)?
    } else {
        collections
            .iter()
            .map(|c| format!("{:<24} {}", c.handle, c.title))
            .collect::<Vec<_>>()
            .join("\n")
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn render(product: &Product) -> String {
    let price = product
        .price_range
        .as_ref()
        .map_or_else(String::new, |range| {
            format!(
                "{} {}",
                catalog::min_price(product),
                range.min_variant_price.currency_code
            )
        });
    format!("{:<32} {:>12}  {}", product.title, price, product.handle)
}
