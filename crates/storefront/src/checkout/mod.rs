//! Checkout session orchestration.
//!
//! # Architecture
//!
//! - [`request`]: server side. Validates a checkout request body and turns it
//!   into a processor session request.
//! - [`client`]: client side. Calls the two checkout endpoints over HTTP.
//! - [`flow`]: client-side state machine from session creation through
//!   payment confirmation to the status page.
//! - [`widget`]: the embedded payment element the flow drives.
//! - [`status_page`]: view model for the post-payment page.

pub mod client;
pub mod flow;
pub mod request;
pub mod status_page;
pub mod widget;

pub use client::{ApiClientError, CheckoutApi, StorefrontApiClient};
pub use flow::{CheckoutFlow, CheckoutState, EmbeddedSession, HostedSession};
pub use request::{RequestError, build_session_request};
pub use status_page::{PaymentOutcome, StatusView, resolve_session};
pub use widget::{PaymentWidget, WidgetError, WidgetState};
