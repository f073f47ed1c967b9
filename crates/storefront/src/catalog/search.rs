//! Free-text substring search.

use crate::shopify::types::Product;

/// Keep products whose title, description or handle contains `query`,
/// ignoring case. A blank query keeps everything.
pub fn search<'a, I>(products: I, query: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.into_iter().collect();
    }

    products
        .into_iter()
        .filter(|product| matches(product, &needle))
        .collect()
}

fn matches(product: &Product, needle: &str) -> bool {
    [
        Some(product.title.as_str()),
        product.description.as_deref(),
        Some(product.handle.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{product, titles};

    #[test]
    fn test_search_red() {
        let products = vec![product("Red Hat", "10", &[]), product("Blue Hat", "5", &[])];
        assert_eq!(titles(&search(&products, "red")), ["Red Hat"]);
    }

    #[test]
    fn test_empty_query_is_identity() {
        let products = vec![product("Red Hat", "10", &[]), product("Blue Hat", "5", &[])];
        assert_eq!(titles(&search(&products, "")), ["Red Hat", "Blue Hat"]);
        assert_eq!(titles(&search(&products, "   ")), ["Red Hat", "Blue Hat"]);
        assert!(search(&[], "").is_empty());
    }

    #[test]
    fn test_query_is_trimmed_and_case_insensitive() {
        let products = vec![product("Red Hat", "10", &[])];
        assert_eq!(search(&products, "  HAT ").len(), 1);
    }

    #[test]
    fn test_matches_description_and_handle() {
        let mut described = product("Beanie", "10", &[]);
        described.description = Some("Knitted from merino wool".to_string());
        let mut handled = product("Cap", "10", &[]);
        handled.handle = "summer-cap-2026".to_string();
        let products = vec![described, handled, product("Scarf", "1", &[])];

        assert_eq!(titles(&search(&products, "merino")), ["Beanie"]);
        assert_eq!(titles(&search(&products, "summer")), ["Cap"]);
    }

    #[test]
    fn test_no_tokenization() {
        let products = vec![product("Red Hat", "10", &[])];
        assert!(search(&products, "hat red").is_empty());
    }
}
