//! Unified error handling with Sentry integration.
//!
//! Provides an application-level `AppError` for the outer surfaces (the CLI)
//! that captures errors to Sentry when reported. Cart and catalog operations
//! have their own error types and never surface `AppError`.

use thiserror::Error;

use crate::cart::{CartError, StoreError};
use crate::config::ConfigError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart identifier store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An operation completed without a result.
    #[error("{0}")]
    Failed(String),
}

impl AppError {
    /// Log this error and, for server-side faults, capture it to Sentry.
    pub fn report(&self) {
        if matches!(
            self,
            Self::Store(_) | Self::Cart(_) | Self::Serialize(_)
        ) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::error!(error = %self, "Command failed");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item to cart", Some(&[("variant_id", "gid://shopify/ProductVariant/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::ShopifyError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Failed("no cart".to_string());
        assert_eq!(err.to_string(), "no cart");

        let err = AppError::from(CartError::from(ShopifyError::RateLimited(2)));
        assert_eq!(
            err.to_string(),
            "Cart error: Remote commerce API error: Rate limited, retry after 2 seconds"
        );

        let err = AppError::from(ConfigError::MissingEnvVar("SHOPIFY_STORE".to_string()));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_report_without_sentry_client() {
        AppError::from(StoreError::Poisoned).report();
        add_breadcrumb("cart", "noop", Some(&[("k", "v")]));
        add_breadcrumb("cart", "noop", None);
    }
}
