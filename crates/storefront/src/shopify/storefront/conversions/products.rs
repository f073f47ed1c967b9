//! Product type conversion functions.

use crate::shopify::types::{Connection, OptionValue, Product, ProductOption};

use super::super::queries::{ProductNode, ProductOptionNode};

/// Flatten a product connection into catalog products, preserving order.
pub fn convert_products(connection: Connection<ProductNode>) -> Vec<Product> {
    connection
        .into_nodes()
        .into_iter()
        .map(convert_product)
        .collect()
}

/// Flatten one product node: edges become plain lists and option value
/// objects become [`OptionValue::Named`].
pub fn convert_product(node: ProductNode) -> Product {
    let images = node.images.map(Connection::into_nodes).unwrap_or_default();
    let featured_image = node.featured_image.or_else(|| images.first().cloned());

    Product {
        id: node.id,
        handle: node.handle,
        title: node.title,
        description: node.description,
        available_for_sale: node.available_for_sale,
        price_range: node.price_range,
        featured_image,
        images,
        options: node.options.into_iter().map(convert_option).collect(),
        variants: node.variants.map(Connection::into_nodes).unwrap_or_default(),
    }
}

fn convert_option(option: ProductOptionNode) -> ProductOption {
    ProductOption {
        id: option.id,
        name: option.name,
        values: option
            .option_values
            .into_iter()
            .map(|v| OptionValue::Named {
                id: v.id,
                name: v.name,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn node(value: serde_json::Value) -> ProductNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_convert_product_flattens_edges() {
        let product = convert_product(node(json!({
            "id": "gid://shopify/Product/1",
            "handle": "red-hat",
            "title": "Red Hat",
            "description": "A hat",
            "availableForSale": true,
            "priceRange": {
                "minVariantPrice": {"amount": "10.0", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "12.0", "currencyCode": "USD"}
            },
            "images": {"edges": [{"node": {"url": "https://cdn/1.jpg", "altText": null}}]},
            "options": [{"id": "o1", "name": "Color", "optionValues": [{"id": "v1", "name": "Red"}]}],
            "variants": {"edges": [{"node": {
                "id": "gid://shopify/ProductVariant/11",
                "title": "Red",
                "availableForSale": true,
                "price": {"amount": "10.0", "currencyCode": "USD"},
                "selectedOptions": [{"name": "Color", "value": "Red"}]
            }}]}
        })));

        assert_eq!(product.title, "Red Hat");
        assert_eq!(product.images.len(), 1);
        assert_eq!(
            product.featured_image.as_ref().map(|i| i.url.as_str()),
            Some("https://cdn/1.jpg")
        );
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].selected_options[0].value, "Red");
        assert_eq!(product.options[0].values[0].label(), Some("Red"));
    }

    #[test]
    fn test_convert_product_missing_connections() {
        let product = convert_product(node(json!({"id": "gid://shopify/Product/2"})));
        assert!(product.images.is_empty());
        assert!(product.featured_image.is_none());
        assert!(product.variants.is_empty());
        assert!(product.options.is_empty());
    }
}
