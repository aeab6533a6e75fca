//! The processor's in-page payment widget, as the checkout flow sees it.

use async_trait::async_trait;
use thiserror::Error;

/// Lifecycle of the payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// Still initializing with the session's client secret.
    Loading,
    /// Initialization failed.
    Error(String),
    /// Ready to collect and confirm payment details.
    Ready,
}

/// Rejection reported by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WidgetError {
    pub message: String,
}

impl WidgetError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Embedded payment element bound to one checkout session.
#[async_trait]
pub trait PaymentWidget: Send {
    fn state(&self) -> WidgetState;

    /// Attach the shopper's email to the session.
    async fn update_email(&mut self, email: &str) -> Result<(), WidgetError>;

    /// Confirm payment. On success the processor sends the shopper to
    /// `return_url`.
    async fn confirm(&mut self, return_url: &str) -> Result<(), WidgetError>;
}
