//! Projection of the remote cart graph into [`Cart`].

use std::str::FromStr;

use acme_core::{CurrencyCode, Price};
use rust_decimal::Decimal;

use crate::cart::CartError;
use crate::cart::types::{
    Cart, CartCost, CartItem, Merchandise, MerchandiseProduct, ProductPriceRange,
};
use crate::shopify::types::{Image, Money, ShopifyCart, ShopifyCartLine};

/// Dimension reported for cart images the API sends without one.
const DEFAULT_IMAGE_SIZE: i64 = 600;

/// Flatten a remote cart.
///
/// Line costs are recomputed as unit price times quantity and the total
/// quantity is derived from the lines; the remote figures for both are
/// ignored. Lines with a quantity below 1 are dropped.
///
/// # Errors
///
/// Returns [`CartError::Malformed`] if an amount is not a decimal or a
/// quantity does not fit in `u32`.
pub fn normalize_cart(remote: ShopifyCart) -> Result<Cart, CartError> {
    let subtotal_amount = parse_money(&remote.cost.subtotal_amount)?;
    let total_amount = parse_money(&remote.cost.total_amount)?;
    let total_tax_amount = match &remote.cost.total_tax_amount {
        Some(tax) => parse_money(tax)?,
        None => Price::zero(total_amount.currency_code.clone()),
    };

    let mut lines = Vec::with_capacity(remote.lines.edges.len());
    for line in remote.lines.into_nodes() {
        if let Some(item) = normalize_line(line)? {
            lines.push(item);
        }
    }

    Ok(Cart {
        id: remote.id,
        checkout_url: remote.checkout_url,
        cost: CartCost {
            subtotal_amount,
            total_amount,
            total_tax_amount,
        },
        lines,
    })
}

fn normalize_line(line: ShopifyCartLine) -> Result<Option<CartItem>, CartError> {
    if line.quantity < 1 {
        tracing::warn!(
            line_id = %line.id,
            quantity = line.quantity,
            "Dropping cart line with non-positive quantity"
        );
        return Ok(None);
    }

    let quantity = u32::try_from(line.quantity).map_err(|_| {
        CartError::Malformed(format!(
            "quantity {} out of range on line {}",
            line.quantity, line.id
        ))
    })?;

    let merchandise = line.merchandise;
    let unit_price = parse_money(&merchandise.price)?;
    let product = merchandise.product;

    let cost = unit_price.times(quantity).ok_or_else(|| {
        CartError::Malformed(format!(
            "line cost overflow on line {}: {} x {quantity}",
            line.id, unit_price.amount
        ))
    })?;

    let images: Vec<Image> = product
        .images
        .map(|connection| connection.into_nodes())
        .unwrap_or_default()
        .into_iter()
        .map(|image| display_image(image, &product.title))
        .collect();

    Ok(Some(CartItem {
        id: line.id,
        quantity,
        cost,
        merchandise: Merchandise {
            id: merchandise.id,
            title: merchandise.title,
            selected_options: merchandise.selected_options.unwrap_or_default(),
            unit_price: unit_price.clone(),
            product: MerchandiseProduct {
                id: product.id,
                handle: product.handle,
                featured_image: images.first().cloned(),
                images,
                title: product.title,
                price_range: ProductPriceRange {
                    min_variant_price: unit_price.clone(),
                    max_variant_price: unit_price,
                },
            },
        },
    }))
}

/// Fill in alt text and dimensions for display.
fn display_image(image: Image, product_title: &str) -> Image {
    Image {
        alt_text: image
            .alt_text
            .filter(|alt| !alt.is_empty())
            .or_else(|| Some(product_title.to_string())),
        width: image.width.or(Some(DEFAULT_IMAGE_SIZE)),
        height: image.height.or(Some(DEFAULT_IMAGE_SIZE)),
        url: image.url,
    }
}

fn parse_money(money: &Money) -> Result<Price, CartError> {
    let amount = Decimal::from_str(money.amount.trim())
        .map_err(|e| CartError::Malformed(format!("amount {:?}: {e}", money.amount)))?;
    Ok(Price::new(amount, CurrencyCode::from(money.currency_code.as_str())))
}
