//! Hosted checkout and payment status.

use std::io::Write;

use fresh_market_core::CheckoutSummary;
use fresh_market_storefront::cart::{CartStorage, CartStore};
use fresh_market_storefront::checkout::{CheckoutFlow, StatusView, StorefrontApiClient};
use url::Url;

use super::CommandError;

/// Create a hosted checkout session for the cart and print where to pay.
pub async fn start<S: CartStorage>(
    api_url: &Url,
    cart: &CartStore<S>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let summary = CheckoutSummary::for_cart(cart.cart());
    if summary.is_fallback {
        writeln!(out, "Cart is empty, checking out the featured product instead")?;
    }

    let mut flow = CheckoutFlow::new(StorefrontApiClient::new(api_url.clone())?);
    let session = flow.begin_hosted(&summary).await?;

    writeln!(out, "Session: {}", session.session_id)?;
    writeln!(out, "Pay at:  {}", session.url)?;
    writeln!(out)?;
    writeln!(out, "Afterwards run: fm-cli status {}", session.session_id)?;
    Ok(())
}

/// Print the payment status of a session. A completed payment clears the
/// cart.
pub async fn status<S: CartStorage>(
    api_url: &Url,
    session_id: &str,
    cart: &mut CartStore<S>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut flow = CheckoutFlow::new(StorefrontApiClient::new(api_url.clone())?);
    let view = flow.resolve(Some(session_id), cart).await;

    render_status(&view, out)?;
    if view.is_success() {
        writeln!(out, "Cart cleared.")?;
    }
    Ok(())
}

fn render_status(view: &StatusView, out: &mut impl Write) -> Result<(), CommandError> {
    writeln!(out, "{}", view.headline())?;

    let rows = view.details();
    if !rows.is_empty() {
        writeln!(out)?;
        for (label, value) in rows {
            writeln!(out, "{label:<22} {value}")?;
        }
    }
    if let Some(url) = view.dashboard_url() {
        writeln!(out)?;
        writeln!(out, "View details: {url}")?;
    }
    Ok(())
}
