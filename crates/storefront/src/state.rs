//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::payments::{PaymentError, PaymentProvider, StripeClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds configuration and the payment
/// processor behind a trait object so tests can substitute a fake.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    /// Create state backed by the live Stripe API.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, PaymentError> {
        let stripe = StripeClient::new(&config.stripe)?;
        Ok(Self::with_provider(config, Arc::new(stripe)))
    }

    /// Create state with an explicit payment provider.
    #[must_use]
    pub fn with_provider(config: StorefrontConfig, payments: Arc<dyn PaymentProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, payments }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the payment provider.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentProvider {
        self.inner.payments.as_ref()
    }
}
