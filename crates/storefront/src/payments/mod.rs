//! Payment processor integration.
//!
//! # Architecture
//!
//! - [`PaymentProvider`] is the seam between checkout handlers and the hosted
//!   payment API. Handlers only ever see this trait.
//! - [`StripeClient`] talks to Stripe Checkout Sessions over REST with
//!   form-encoded requests.
//! - [`FakePaymentProvider`] records requests and returns canned sessions for
//!   tests.
//!
//! The processor is the source of truth for session state. Nothing here is
//! cached or retried: every call is a single request per user action.

mod fake;
mod stripe;

pub use fake::FakePaymentProvider;
pub use stripe::StripeClient;

use async_trait::async_trait;
use fresh_market_core::{
    CheckoutSessionId, CheckoutSessionStatus, CurrencyCode, FormattedTotals, PaymentIntentId,
    PaymentIntentStatus, SessionPaymentStatus,
};
use thiserror::Error;

/// Errors that can occur when interacting with the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Processor returned an error response. `message` is the processor's
    /// own text and is safe to show to the shopper.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One line of a checkout session, in the processor's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItem {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub currency: CurrencyCode,
    /// Unit price in minor units (cents).
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Where the shopper goes after paying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// Processor-hosted payment page with separate success and cancel pages.
    Hosted {
        success_url: String,
        cancel_url: String,
    },
    /// In-page payment widget with a single return page.
    Embedded { return_url: String },
}

/// Everything needed to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<SessionLineItem>,
    pub mode: SessionMode,
    /// Totals attached as opaque metadata for later reconciliation.
    pub metadata: FormattedTotals,
}

/// A newly created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub id: CheckoutSessionId,
    /// Redirect URL (hosted mode).
    pub url: Option<String>,
    /// Browser-side authorization token (embedded mode).
    pub client_secret: Option<String>,
}

/// The payment intent behind a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentSummary {
    pub id: PaymentIntentId,
    pub status: Option<PaymentIntentStatus>,
}

/// Processor-reported state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: Option<CheckoutSessionId>,
    pub status: Option<CheckoutSessionStatus>,
    pub payment_status: Option<SessionPaymentStatus>,
    pub payment_intent: Option<PaymentIntentSummary>,
}

/// The hosted payment API.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a checkout session.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CreatedSession, PaymentError>;

    /// Retrieve a session with its payment intent expanded.
    async fn retrieve_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<SessionSnapshot, PaymentError>;
}
