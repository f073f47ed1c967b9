//! Cart failure taxonomy.

use thiserror::Error;

use crate::cart::store::StoreError;
use crate::shopify::ShopifyError;

/// Why a cart operation did not produce a result.
///
/// The public [`CartManager`](crate::cart::CartManager) operations collapse
/// these to `None` after logging; the `try_*` operations return them.
#[derive(Debug, Error)]
pub enum CartError {
    /// Network or API failure.
    #[error("Remote commerce API error: {0}")]
    Remote(#[source] ShopifyError),

    /// Missing variant or cart identifier, or input the API rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The cart expired or was deleted remotely.
    #[error("Cart not found: {0}")]
    NotFound(String),

    /// The remote payload could not be normalized.
    #[error("Malformed cart payload: {0}")]
    Malformed(String),

    /// The persisted cart identifier could not be read or written.
    #[error("Cart identifier store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ShopifyError> for CartError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::UserError(message) => Self::InvalidInput(message),
            ShopifyError::Parse(e) => Self::Malformed(e.to_string()),
            other => Self::Remote(other),
        }
    }
}

impl CartError {
    /// Log this failure at the level its kind warrants.
    pub(crate) fn log(&self, operation: &'static str) {
        match self {
            Self::Remote(_) | Self::Malformed(_) | Self::Store(_) => {
                tracing::error!(operation, error = %self, "Cart operation failed");
            }
            Self::NotFound(_) => {
                tracing::warn!(operation, error = %self, "Cart not found");
            }
            Self::InvalidInput(_) => {
                tracing::debug!(operation, error = %self, "Cart operation rejected");
            }
        }
    }
}
