//! Server-side translation of a checkout request into a payment session.

use fresh_market_core::{
    CheckoutItem, CheckoutTotals, CreateCheckoutSessionBody, CurrencyCode, Price, UiMode,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::payments::{CheckoutSessionRequest, SessionLineItem, SessionMode};

/// Placeholder the processor replaces with the real session id.
const SESSION_ID_TEMPLATE: &str = "{CHECKOUT_SESSION_ID}";

/// Why a checkout request was rejected before reaching the processor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("No items provided")]
    NoItems,

    #[error("Quantity for {0} must be at least 1")]
    ZeroQuantity(String),

    #[error("Price for {0} must not be negative")]
    NegativePrice(String),

    #[error("Price for {0} is out of range")]
    AmountOutOfRange(String),

    #[error("Order total is out of range")]
    TotalOutOfRange,
}

/// Page the processor sends the shopper to after paying.
#[must_use]
pub fn success_url(origin: &str) -> String {
    format!("{origin}/checkout/success?session_id={SESSION_ID_TEMPLATE}")
}

/// Page the processor sends the shopper back to on cancel.
#[must_use]
pub fn cancel_url(origin: &str) -> String {
    format!("{origin}/checkout?canceled=true")
}

/// Validate a request body and build the processor request for it.
///
/// Totals attached as metadata are recomputed from the items, keeping the
/// empty-cart fallback when the items are its stand-in. Client totals that
/// disagree are logged and ignored.
///
/// # Errors
///
/// Returns [`RequestError`] if there are no items or an item is invalid.
pub fn build_session_request(
    body: &CreateCheckoutSessionBody,
    origin: &str,
) -> Result<(UiMode, CheckoutSessionRequest), RequestError> {
    let items = match body.items.as_deref() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(RequestError::NoItems),
    };

    let line_items = items
        .iter()
        .map(line_item)
        .collect::<Result<Vec<_>, _>>()?;

    let totals =
        CheckoutTotals::for_submission(items, body.tax).ok_or(RequestError::TotalOutOfRange)?;
    warn_on_total_mismatch(body, &totals);

    let ui_mode = UiMode::from_flag(body.ui_mode.as_deref());
    let mode = match ui_mode {
        UiMode::Hosted => SessionMode::Hosted {
            success_url: success_url(origin),
            cancel_url: cancel_url(origin),
        },
        UiMode::Embedded => SessionMode::Embedded {
            return_url: success_url(origin),
        },
    };

    Ok((
        ui_mode,
        CheckoutSessionRequest {
            line_items,
            mode,
            metadata: totals.formatted(),
        },
    ))
}

fn line_item(item: &CheckoutItem) -> Result<SessionLineItem, RequestError> {
    if item.quantity == 0 {
        return Err(RequestError::ZeroQuantity(item.name.clone()));
    }
    if item.price.is_sign_negative() && !item.price.is_zero() {
        return Err(RequestError::NegativePrice(item.name.clone()));
    }
    let out_of_range = || RequestError::AmountOutOfRange(item.name.clone());
    let unit_amount = Price::usd(item.price).minor_units().ok_or_else(out_of_range)?;
    item.line_total()
        .and_then(|total| Price::usd(total).minor_units())
        .ok_or_else(out_of_range)?;

    let images = if item.image.is_empty() {
        Vec::new()
    } else {
        vec![item.image.clone()]
    };

    Ok(SessionLineItem {
        name: item.name.clone(),
        description: item.description(),
        images,
        currency: CurrencyCode::USD,
        unit_amount,
        quantity: item.quantity,
    })
}

fn warn_on_total_mismatch(body: &CreateCheckoutSessionBody, totals: &CheckoutTotals) {
    let pairs: [(&str, Option<Decimal>, Decimal); 3] = [
        ("subtotal", body.subtotal, totals.subtotal),
        ("tax", body.tax, totals.tax),
        ("total", body.total, totals.total),
    ];
    for (field, client, server) in pairs {
        let Some(client) = client else { continue };
        let client = Price::usd(client).rounded();
        let server = Price::usd(server).rounded();
        if client != server {
            tracing::warn!(
                field,
                client = %client,
                server = %server,
                "Client checkout totals disagree with recomputed totals"
            );
        }
    }
}
