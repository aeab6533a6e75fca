//! What the shopper sees after returning from payment.

use fresh_market_core::{CheckoutSessionStatus, SessionStatusReply};

use super::client::CheckoutApi;

pub const SUCCESS_COLOR: &str = "#30B130";
pub const FAILURE_COLOR: &str = "#DF1B41";
pub const SUCCESS_TEXT: &str = "Payment succeeded";
pub const FAILURE_TEXT: &str = "Something went wrong, please try again.";

const DASHBOARD_PAYMENTS_URL: &str = "https://dashboard.stripe.com/payments";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// Status page view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub outcome: PaymentOutcome,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_intent_id: Option<String>,
    pub payment_intent_status: Option<String>,
}

impl StatusView {
    /// View for a status reply. Only `status == "complete"` succeeds.
    #[must_use]
    pub fn from_reply(reply: SessionStatusReply) -> Self {
        let complete = reply.status.as_deref() == Some(CheckoutSessionStatus::Complete.as_str());
        Self {
            outcome: if complete {
                PaymentOutcome::Succeeded
            } else {
                PaymentOutcome::Failed
            },
            status: non_empty(reply.status),
            payment_status: non_empty(reply.payment_status),
            payment_intent_id: non_empty(reply.payment_intent_id),
            payment_intent_status: non_empty(reply.payment_intent_status),
        }
    }

    /// View used when no status could be obtained.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            outcome: PaymentOutcome::Failed,
            status: None,
            payment_status: None,
            payment_intent_id: None,
            payment_intent_status: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == PaymentOutcome::Succeeded
    }

    #[must_use]
    pub const fn icon_color(&self) -> &'static str {
        match self.outcome {
            PaymentOutcome::Succeeded => SUCCESS_COLOR,
            PaymentOutcome::Failed => FAILURE_COLOR,
        }
    }

    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self.outcome {
            PaymentOutcome::Succeeded => SUCCESS_TEXT,
            PaymentOutcome::Failed => FAILURE_TEXT,
        }
    }

    /// Labelled detail rows. Empty unless a payment intent is known; each row
    /// appears only when its value is present.
    #[must_use]
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        let Some(intent_id) = self.payment_intent_id.as_deref() else {
            return Vec::new();
        };

        let mut rows = vec![("Payment Intent ID", intent_id)];
        if let Some(status) = self.status.as_deref() {
            rows.push(("Status", status));
        }
        if let Some(payment_status) = self.payment_status.as_deref() {
            rows.push(("Payment Status", payment_status));
        }
        if let Some(intent_status) = self.payment_intent_status.as_deref() {
            rows.push(("Payment Intent Status", intent_status));
        }
        rows
    }

    /// Processor dashboard link for the payment intent.
    #[must_use]
    pub fn dashboard_url(&self) -> Option<String> {
        self.payment_intent_id
            .as_deref()
            .map(|id| format!("{DASHBOARD_PAYMENTS_URL}/{id}"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Query the session status once and build the view.
///
/// A missing session id, a failed request or an unreadable reply all yield
/// the failure view.
pub async fn resolve_session<A: CheckoutApi + ?Sized>(
    api: &A,
    session_id: Option<&str>,
) -> StatusView {
    let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
        tracing::warn!("Status page opened without a session id");
        return StatusView::failed();
    };

    match api.session_status(session_id).await {
        Ok(reply) => StatusView::from_reply(reply),
        Err(error) => {
            tracing::warn!(%error, session_id, "Failed to fetch session status");
            StatusView::failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: Option<&str>, intent: Option<&str>) -> SessionStatusReply {
        SessionStatusReply {
            status: status.map(str::to_string),
            payment_status: Some("paid".to_string()),
            payment_intent_id: intent.map(str::to_string),
            payment_intent_status: Some("succeeded".to_string()),
            error: None,
        }
    }

    #[test]
    fn test_complete_is_success() {
        let view = StatusView::from_reply(reply(Some("complete"), Some("pi_123")));
        assert!(view.is_success());
        assert_eq!(view.icon_color(), "#30B130");
        assert_eq!(view.headline(), "Payment succeeded");
        assert_eq!(
            view.dashboard_url().as_deref(),
            Some("https://dashboard.stripe.com/payments/pi_123")
        );
        assert_eq!(
            view.details(),
            vec![
                ("Payment Intent ID", "pi_123"),
                ("Status", "complete"),
                ("Payment Status", "paid"),
                ("Payment Intent Status", "succeeded"),
            ]
        );
    }

    #[test]
    fn test_open_is_failure() {
        let view = StatusView::from_reply(reply(Some("open"), Some("pi_1")));
        assert!(!view.is_success());
        assert_eq!(view.icon_color(), "#DF1B41");
        assert_eq!(view.headline(), "Something went wrong, please try again.");
    }

    #[test]
    fn test_missing_status_is_failure() {
        let view = StatusView::from_reply(reply(None, None));
        assert_eq!(view.outcome, PaymentOutcome::Failed);
        assert!(view.details().is_empty());
        assert!(view.dashboard_url().is_none());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let view = StatusView::from_reply(reply(Some("complete"), Some("")));
        assert!(view.payment_intent_id.is_none());
        assert!(view.details().is_empty());
    }
}
