//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;

use fresh_market_core::catalog::CatalogError;
use fresh_market_storefront::checkout::ApiClientError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Product id or slug not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No cart line with this product and size.
    #[error("{product} (size {size}) is not in the cart")]
    NotInCart { product: String, size: String },

    /// Checkout API call failed.
    #[error("Checkout API error: {0}")]
    Api(#[from] ApiClientError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
