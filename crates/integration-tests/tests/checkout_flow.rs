//! Client checkout flow against a live local storefront.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fresh_market_core::{
    CheckoutSessionStatus, CheckoutSummary, PaymentIntentStatus, SessionPaymentStatus, catalog,
};
use fresh_market_integration_tests::{spawn, test_app};
use fresh_market_storefront::cart::{CartStore, FileStorage};
use fresh_market_storefront::checkout::{
    CheckoutFlow, CheckoutState, PaymentOutcome, PaymentWidget, StorefrontApiClient, WidgetError,
    WidgetState,
};
use fresh_market_storefront::payments::{
    FakePaymentProvider, PaymentIntentSummary, SessionMode, SessionSnapshot,
};

/// Widget that accepts everything and records the return URL.
#[derive(Default)]
struct AcceptingWidget {
    emails: Vec<String>,
    confirmed: Option<String>,
}

#[async_trait]
impl PaymentWidget for AcceptingWidget {
    fn state(&self) -> WidgetState {
        WidgetState::Ready
    }

    async fn update_email(&mut self, email: &str) -> Result<(), WidgetError> {
        self.emails.push(email.to_string());
        Ok(())
    }

    async fn confirm(&mut self, return_url: &str) -> Result<(), WidgetError> {
        self.confirmed = Some(return_url.to_string());
        Ok(())
    }
}

fn cart_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fresh-market-flow-{}", uuid::Uuid::new_v4()))
}

async fn live_flow(fake: Arc<FakePaymentProvider>) -> CheckoutFlow<StorefrontApiClient> {
    let base = spawn(test_app(fake)).await;
    CheckoutFlow::new(StorefrontApiClient::new(base).unwrap())
}

#[tokio::test]
async fn test_embedded_checkout_end_to_end() {
    let fake = Arc::new(FakePaymentProvider::new());
    let dir = cart_dir();
    let mut cart = CartStore::load(FileStorage::new(&dir));
    cart.add(catalog::featured().to_line_item("1", 2));

    let mut flow = live_flow(fake.clone()).await;
    let summary = CheckoutSummary::for_cart(cart.cart());

    let state = flow.begin(&summary).await.clone();
    let CheckoutState::Ready { session, .. } = state else {
        panic!("expected Ready, got {state:?}");
    };
    assert_eq!(session.session_id.as_str(), "cs_test_1");
    assert_eq!(session.client_secret, "cs_test_1_secret_1");

    let requests = fake.requests();
    assert!(matches!(requests[0].mode, SessionMode::Embedded { .. }));
    assert_eq!(requests[0].line_items[0].unit_amount, 699);
    assert_eq!(requests[0].line_items[0].quantity, 2);
    assert_eq!(requests[0].metadata.subtotal, "13.98");

    let mut widget = AcceptingWidget::default();
    flow.check_email(&mut widget, "shopper@example.com").await;
    assert_eq!(widget.emails, vec!["shopper@example.com".to_string()]);

    let state = flow.submit(&mut widget, "shopper@example.com").await;
    assert_eq!(
        *state,
        CheckoutState::Redirected {
            session_id: session.session_id.clone(),
            return_path: "/checkout/success?session_id=cs_test_1".to_string(),
        }
    );
    assert_eq!(
        widget.confirmed.as_deref(),
        Some("/checkout/success?session_id=cs_test_1")
    );

    fake.insert_session(
        "cs_test_1",
        SessionSnapshot {
            status: Some(CheckoutSessionStatus::Complete),
            payment_status: Some(SessionPaymentStatus::Paid),
            payment_intent: Some(PaymentIntentSummary {
                id: "pi_live".into(),
                status: Some(PaymentIntentStatus::Succeeded),
            }),
            ..Default::default()
        },
    );

    let view = flow.resolve(Some("cs_test_1"), &mut cart).await;
    assert_eq!(view.outcome, PaymentOutcome::Succeeded);
    assert_eq!(view.payment_intent_id.as_deref(), Some("pi_live"));
    assert!(cart.is_empty());

    // The cleared cart is what a fresh load sees.
    let reloaded = CartStore::load(FileStorage::new(&dir));
    assert!(reloaded.is_empty());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_hosted_checkout_returns_redirect_url() {
    let fake = Arc::new(FakePaymentProvider::new());
    let mut flow = live_flow(fake.clone()).await;

    let empty = fresh_market_core::Cart::default();
    let summary = CheckoutSummary::for_cart(&empty);
    assert!(summary.is_fallback);

    let session = flow.begin_hosted(&summary).await.unwrap();
    assert_eq!(session.url, "https://checkout.test/pay/cs_test_1");
    assert!(matches!(flow.state(), CheckoutState::Redirected { .. }));

    let requests = fake.requests();
    assert_eq!(requests[0].line_items[0].name, catalog::featured().name);
    assert_eq!(requests[0].metadata.total, "11.98");
}

#[tokio::test]
async fn test_processor_failure_surfaces_message() {
    let fake = Arc::new(FakePaymentProvider::new());
    fake.fail_with(402, "Your card was declined.");
    let mut flow = live_flow(fake).await;

    let mut cart = fresh_market_core::Cart::default();
    cart.add(catalog::featured().to_line_item("1", 1));

    let state = flow.begin(&CheckoutSummary::for_cart(&cart)).await;
    assert_eq!(
        *state,
        CheckoutState::Failed {
            message: "Your card was declined.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_open_session_keeps_cart() {
    let fake = Arc::new(FakePaymentProvider::new());
    fake.insert_session(
        "cs_open",
        SessionSnapshot {
            status: Some(CheckoutSessionStatus::Open),
            payment_status: Some(SessionPaymentStatus::Unpaid),
            ..Default::default()
        },
    );
    let mut flow = live_flow(fake).await;

    let dir = cart_dir();
    let mut cart = CartStore::load(FileStorage::new(&dir));
    cart.add(catalog::featured().to_line_item("1", 1));

    let view = flow.resolve(Some("cs_open"), &mut cart).await;
    assert_eq!(view.outcome, PaymentOutcome::Failed);
    assert_eq!(cart.item_count(), 1);

    let view = flow.resolve(None, &mut cart).await;
    assert_eq!(view.outcome, PaymentOutcome::Failed);
    assert_eq!(cart.item_count(), 1);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_live_server_echoes_request_id() {
    let fake = Arc::new(FakePaymentProvider::new());
    let base = spawn(test_app(fake)).await;

    let response = reqwest::Client::new()
        .get(base.join("health").unwrap())
        .header("x-request-id", "flow-test-42")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "flow-test-42"
    );
    assert_eq!(response.text().await.unwrap(), "ok");
}
