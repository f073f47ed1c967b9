//! Cart commands.
//!
//! The cart identifier is kept in the cookie file named by
//! `STOREFRONT_CART_STORE`, so consecutive invocations share one cart.
//!
//! # Usage
//!
//! ```bash
//! acme cart add gid://shopify/ProductVariant/123
//! acme cart update gid://shopify/CartLine/abc 3
//! acme cart show --json
//! ```

use acme_storefront::cart::{CART_ID_KEY, Cart, CartManager};
use acme_storefront::error::{AppError, Result};

/// Print the current cart.
pub async fn show(manager: &CartManager, json: bool) -> Result<()> {
    let cart = manager
        .get_cart()
        .await
        .ok_or_else(|| AppError::Failed("No cart".to_string()))?;
    print_cart(&cart, json)
}

/// Add one unit of a variant.
pub async fn add(manager: &CartManager, variant_id: &str, json: bool) -> Result<()> {
    let cart = manager
        .add_item(Some(variant_id))
        .await
        .ok_or_else(|| AppError::Failed("Unable to add item to cart".to_string()))?;
    print_cart(&cart, json)
}

/// Set a line's quantity; zero removes it.
pub async fn update(manager: &CartManager, line_id: &str, quantity: u32, json: bool) -> Result<()> {
    let cart = manager
        .update_item(line_id, quantity)
        .await
        .ok_or_else(|| AppError::Failed("Unable to update cart".to_string()))?;
    print_cart(&cart, json)
}

/// Start a new cart and print its cookie.
pub async fn create(manager: &CartManager) -> Result<()> {
    let created = manager
        .create_cart_and_set_cookie()
        .await
        .ok_or_else(|| AppError::Failed("Unable to create cart".to_string()))?;
    let cookie = manager
        .stored_entry()?
        .map(|entry| entry.set_cookie(CART_ID_KEY))
        .unwrap_or_default();

    #[allow(clippy::print_stdout)]
    {
        println!("Cart:     {}", created.id);
        println!("Checkout: {}", created.checkout_url);
        println!("Set-Cookie: {cookie}");
    }
    Ok(())
}

/// Drop the stored cart identifier.
pub fn forget(manager: &CartManager) -> Result<()> {
    manager.forget()?;
    tracing::info!("Cart identifier removed");
    Ok(())
}

fn print_cart(cart: &Cart, json: bool) -> Result<()> {
    let output = if json {
        serde_json::to_string_pretty(cart)?
    } else {
        render(cart)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn render(cart: &Cart) -> String {
    let mut out = format!("Cart {}\n", cart.id);

    for line in &cart.lines {
        let merchandise = &line.merchandise;
        let variant = if merchandise.title == "Default Title" {
            String::new()
        } else {
            format!(" ({})", merchandise.title)
        };
        out.push_str(&format!(
            "  {} x {}{variant} @ {} = {}  [{}]\n",
            line.quantity, merchandise.product.title, merchandise.unit_price, line.cost, line.id
        ));
    }

    out.push_str(&format!(
        "Items: {}  Subtotal: {}  Tax: {}  Total: {}\nCheckout: {}",
        cart.total_quantity(),
        cart.cost.subtotal_amount,
        cart.cost.total_tax_amount,
        cart.cost.total_amount,
        cart.checkout_url
    ));
    out
}
