//! Checkout totals and the JSON bodies exchanged with the checkout API.
//!
//! # Totals
//!
//! ```text
//! subtotal = Σ (unit_price × quantity)
//! tax      = subtotal × TAX_RATE
//! total    = subtotal + SHIPPING_COST + tax
//! ```
//!
//! Amounts are kept at full precision and only rounded to cents when
//! formatted (see [`FormattedTotals`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartLineItem};
use super::price::{Price, amount};
use crate::catalog::{self, DEFAULT_SIZE, SHIPPING_COST, TAX_RATE};

/// Order totals derived from a set of lines. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CheckoutTotals {
    /// Apply the store's shipping cost and tax rate to a subtotal.
    /// Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal.saturating_mul(TAX_RATE);
        Self {
            subtotal,
            shipping: SHIPPING_COST,
            tax,
            total: subtotal.saturating_add(SHIPPING_COST).saturating_add(tax),
        }
    }

    fn checked_from_subtotal(subtotal: Decimal) -> Option<Self> {
        let tax = subtotal.checked_mul(TAX_RATE)?;
        Some(Self {
            subtotal,
            shipping: SHIPPING_COST,
            tax,
            total: subtotal.checked_add(SHIPPING_COST)?.checked_add(tax)?,
        })
    }

    /// Totals for the current cart contents.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self::from_subtotal(cart.subtotal())
    }

    /// Totals recomputed from checkout request items, or `None` if any
    /// amount overflows.
    #[must_use]
    pub fn for_items(items: &[CheckoutItem]) -> Option<Self> {
        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?))?;
        Self::checked_from_subtotal(subtotal)
    }

    /// Totals for a submitted checkout. A single featured product at
    /// quantity one sent with zero tax is the empty-cart stand-in and gets
    /// [`featured_fallback`](Self::featured_fallback); anything else is
    /// recomputed with [`for_items`](Self::for_items).
    #[must_use]
    pub fn for_submission(items: &[CheckoutItem], client_tax: Option<Decimal>) -> Option<Self> {
        let featured = catalog::featured();
        let is_fallback = client_tax.is_some_and(|tax| tax.is_zero())
            && matches!(
                items,
                [item] if item.name == featured.name
                    && item.price == featured.price
                    && item.quantity == 1
            );
        if is_fallback {
            Some(Self::featured_fallback())
        } else {
            Self::for_items(items)
        }
    }

    /// Totals shown when the cart is empty: the featured product's price,
    /// no tax, plus the delivery charge.
    #[must_use]
    pub fn featured_fallback() -> Self {
        let price = catalog::featured().price;
        Self {
            subtotal: price,
            shipping: SHIPPING_COST,
            tax: Decimal::ZERO,
            total: price + SHIPPING_COST,
        }
    }

    /// Two-decimal string rendering of every amount.
    #[must_use]
    pub fn formatted(&self) -> FormattedTotals {
        FormattedTotals {
            subtotal: Price::usd(self.subtotal).to_fixed(),
            shipping: Price::usd(self.shipping).to_fixed(),
            tax: Price::usd(self.tax).to_fixed(),
            total: Price::usd(self.total).to_fixed(),
        }
    }
}

/// Totals rounded to cents, as attached to payment sessions and shown in
/// the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTotals {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

/// What the checkout page shows: the lines being bought and their totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub items: Vec<CartLineItem>,
    pub totals: CheckoutTotals,
    /// True when the cart was empty and the featured product stands in.
    pub is_fallback: bool,
}

impl CheckoutSummary {
    /// Summarize a cart, falling back to the featured product when empty.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self {
                items: vec![catalog::featured().to_line_item(DEFAULT_SIZE, 1)],
                totals: CheckoutTotals::featured_fallback(),
                is_fallback: true,
            };
        }

        Self {
            items: cart.items().to_vec(),
            totals: CheckoutTotals::for_cart(cart),
            is_fallback: false,
        }
    }

    /// Request body for creating a checkout session from this summary.
    #[must_use]
    pub fn to_request(&self, ui_mode: UiMode) -> CreateCheckoutSessionBody {
        CreateCheckoutSessionBody {
            items: Some(self.items.iter().map(CheckoutItem::from).collect()),
            total: Some(self.totals.total),
            subtotal: Some(self.totals.subtotal),
            tax: Some(self.totals.tax),
            ui_mode: Some(ui_mode.as_str().to_string()),
        }
    }
}

/// How the payment page is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UiMode {
    /// Redirect to the processor's hosted checkout page.
    Hosted,
    /// Collect payment details in-page with the processor's widget.
    #[default]
    Embedded,
}

impl UiMode {
    /// Only the exact flag `"hosted"` selects hosted mode.
    #[must_use]
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("hosted") => Self::Hosted,
            _ => Self::Embedded,
        }
    }

    /// Flag value sent by clients.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hosted => "hosted",
            Self::Embedded => "custom",
        }
    }
}

/// A cart line as submitted to `/api/create-checkout-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(with = "amount")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl CheckoutItem {
    /// Unit price × quantity, or `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Free-text description combining subtitle, color and size.
    #[must_use]
    pub fn description(&self) -> String {
        let color = if self.color.is_empty() {
            "N/A"
        } else {
            self.color.as_str()
        };
        format!("{} - {} - Size: {}", self.subtitle, color, self.size)
    }
}

impl From<&CartLineItem> for CheckoutItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            name: line.name.clone(),
            subtitle: line.subtitle.clone(),
            color: line.color.clone(),
            size: line.size.clone(),
            price: line.price,
            quantity: line.quantity,
            image: line.image.clone(),
        }
    }
}

/// Body of `POST /api/create-checkout-session`.
///
/// Every field is optional on the wire so the server can answer a missing
/// `items` with a 400 instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionBody {
    #[serde(default)]
    pub items: Option<Vec<CheckoutItem>>,
    #[serde(default, with = "amount::option")]
    pub total: Option<Decimal>,
    #[serde(default, with = "amount::option")]
    pub subtotal: Option<Decimal>,
    #[serde(default, with = "amount::option")]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub ui_mode: Option<String>,
}

/// Successful response of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckoutSessionCreated {
    Hosted {
        #[serde(rename = "sessionId")]
        session_id: String,
        url: Option<String>,
    },
    Embedded {
        #[serde(rename = "clientSecret")]
        client_secret: Option<String>,
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Client-side view of any `/api/create-checkout-session` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionReply {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/session-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatusBody {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response of `POST /api/session-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatusReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub payment_intent_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
