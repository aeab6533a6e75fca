//! Core types for Fresh Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod checkout;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use cart::{Cart, CartLineItem};
pub use checkout::{
    CheckoutItem, CheckoutSessionCreated, CheckoutSessionReply, CheckoutSummary, CheckoutTotals,
    CreateCheckoutSessionBody, FormattedTotals, SessionStatusBody, SessionStatusReply, UiMode,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
