//! Color filtering.
//!
//! Variant selected options are checked first; the product's own option
//! definitions are the fallback for products whose variants carry no
//! matching color.

use crate::shopify::types::{OptionValue, Product, ProductOption, SelectedOption};

/// Whether an option name denotes a color ("Color", "Colour", "Base colour").
#[must_use]
pub fn is_color_option(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("color") || name.contains("colour")
}

/// Keep products that carry any of the selected colors. Blank tokens are
/// ignored; no tokens keeps everything.
pub fn filter_by_colors<'a, I, S>(products: I, colors: &[S]) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
    S: AsRef<str>,
{
    let selected: Vec<String> = colors
        .iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();

    if selected.is_empty() {
        return products.into_iter().collect();
    }

    products
        .into_iter()
        .filter(|product| has_color(product, &selected))
        .collect()
}

fn has_color(product: &Product, selected: &[String]) -> bool {
    let from_variants = product
        .variants
        .iter()
        .flat_map(|variant| &variant.selected_options)
        .any(|option| selected_option_matches(option, selected));

    from_variants
        || product
            .options
            .iter()
            .any(|option| product_option_matches(option, selected))
}

fn selected_option_matches(option: &SelectedOption, selected: &[String]) -> bool {
    is_color_option(&option.name) && value_matches(&option.value, selected)
}

fn product_option_matches(option: &ProductOption, selected: &[String]) -> bool {
    is_color_option(&option.name)
        && option
            .values
            .iter()
            .filter_map(OptionValue::label)
            .any(|value| value_matches(value, selected))
}

/// Case-insensitive equality or containment in either direction.
fn value_matches(value: &str, selected: &[String]) -> bool {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return false;
    }

    selected
        .iter()
        .any(|color| *color == value || value.contains(color.as_str()) || color.contains(&value))
}
