//! Stripe wire format against a local stand-in for the Stripe API.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Form, Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fresh_market_core::{
    CheckoutSessionId, CheckoutSessionStatus, CurrencyCode, FormattedTotals, PaymentIntentStatus,
    SessionPaymentStatus,
};
use fresh_market_integration_tests::{post_json, spawn, test_config};
use fresh_market_storefront::AppState;
use fresh_market_storefront::payments::{
    CheckoutSessionRequest, PaymentError, PaymentProvider, SessionLineItem, SessionMode,
    StripeClient,
};
use serde_json::{Value, json};
use url::Url;

/// One request seen by the stand-in.
#[derive(Debug, Clone)]
struct Seen {
    authorization: Option<String>,
    version: Option<String>,
    form: Vec<(String, String)>,
    query: Option<String>,
}

#[derive(Clone, Default)]
struct StandIn {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl StandIn {
    fn record(&self, headers: &HeaderMap, form: Vec<(String, String)>, query: Option<String>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        self.seen.lock().unwrap().push(Seen {
            authorization: header("authorization"),
            version: header("stripe-version"),
            form,
            query,
        });
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn create_session(
    State(stand_in): State<StandIn>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    let embedded = form.iter().any(|(k, v)| k == "ui_mode" && v == "custom");
    stand_in.record(&headers, form, None);

    if embedded {
        Json(json!({
            "id": "cs_test_embedded",
            "object": "checkout.session",
            "url": null,
            "client_secret": "cs_test_embedded_secret_abc"
        }))
        .into_response()
    } else {
        Json(json!({
            "id": "cs_test_hosted",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_hosted",
            "client_secret": null
        }))
        .into_response()
    }
}

async fn retrieve_session(
    State(stand_in): State<StandIn>,
    headers: HeaderMap,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    stand_in.record(&headers, Vec::new(), query);

    match id.as_str() {
        "cs_test_paid" => Json(json!({
            "id": "cs_test_paid",
            "object": "checkout.session",
            "status": "complete",
            "payment_status": "paid",
            "payment_intent": {
                "id": "pi_3abc",
                "object": "payment_intent",
                "status": "succeeded"
            }
        }))
        .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": format!("No such checkout.session: '{id}'")
                }
            })),
        )
            .into_response(),
    }
}

async fn stripe_stand_in() -> (StandIn, Url) {
    let stand_in = StandIn::default();
    let app = Router::new()
        .route("/v1/checkout/sessions", post(create_session))
        .route("/v1/checkout/sessions/{id}", get(retrieve_session))
        .with_state(stand_in.clone());
    let base = spawn(app).await;
    (stand_in, base)
}

fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn request(mode: SessionMode) -> CheckoutSessionRequest {
    CheckoutSessionRequest {
        line_items: vec![SessionLineItem {
            name: "Artisan Sourdough Bread".to_string(),
            description: "Bakery - Bakery - Size: 1".to_string(),
            images: vec!["https://images.example.com/bread.jpg".to_string()],
            currency: CurrencyCode::USD,
            unit_amount: 699,
            quantity: 2,
        }],
        mode,
        metadata: FormattedTotals {
            subtotal: "13.98".to_string(),
            shipping: "4.99".to_string(),
            tax: "1.31".to_string(),
            total: "20.28".to_string(),
        },
    }
}

#[tokio::test]
async fn test_create_hosted_session_wire_format() {
    let (stand_in, base) = stripe_stand_in().await;
    let client = StripeClient::new(&test_config(&base).stripe).unwrap();

    let created = client
        .create_checkout_session(&request(SessionMode::Hosted {
            success_url: "http://localhost:5173/checkout/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "http://localhost:5173/checkout?canceled=true".to_string(),
        }))
        .await
        .unwrap();

    assert_eq!(created.id.as_str(), "cs_test_hosted");
    assert_eq!(
        created.url.as_deref(),
        Some("https://checkout.stripe.com/c/pay/cs_test_hosted")
    );
    assert!(created.client_secret.is_none());

    let seen = stand_in.seen();
    let seen = &seen[0];
    assert_eq!(
        seen.authorization.as_deref(),
        Some("Bearer sk_test_51ShiIxLlwE3MW2ahqcf5GHv1wxm1Jq")
    );
    assert!(seen.version.is_some());

    let form = &seen.form;
    assert_eq!(field(form, "mode"), Some("payment"));
    assert_eq!(field(form, "payment_method_types[0]"), Some("card"));
    assert_eq!(field(form, "line_items[0][price_data][currency]"), Some("usd"));
    assert_eq!(field(form, "line_items[0][price_data][unit_amount]"), Some("699"));
    assert_eq!(
        field(form, "line_items[0][price_data][product_data][name]"),
        Some("Artisan Sourdough Bread")
    );
    assert_eq!(
        field(form, "line_items[0][price_data][product_data][images][0]"),
        Some("https://images.example.com/bread.jpg")
    );
    assert_eq!(field(form, "line_items[0][quantity]"), Some("2"));
    assert_eq!(
        field(form, "cancel_url"),
        Some("http://localhost:5173/checkout?canceled=true")
    );
    assert_eq!(field(form, "ui_mode"), None);
    assert_eq!(field(form, "metadata[total]"), Some("20.28"));
}

#[tokio::test]
async fn test_create_embedded_session_wire_format() {
    let (stand_in, base) = stripe_stand_in().await;
    let client = StripeClient::new(&test_config(&base).stripe).unwrap();

    let created = client
        .create_checkout_session(&request(SessionMode::Embedded {
            return_url: "http://localhost:5173/checkout/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
        }))
        .await
        .unwrap();

    assert_eq!(created.id.as_str(), "cs_test_embedded");
    assert_eq!(
        created.client_secret.as_deref(),
        Some("cs_test_embedded_secret_abc")
    );

    let form = &stand_in.seen()[0].form;
    assert_eq!(field(form, "ui_mode"), Some("custom"));
    assert_eq!(
        field(form, "return_url"),
        Some("http://localhost:5173/checkout/success?session_id={CHECKOUT_SESSION_ID}")
    );
    assert_eq!(field(form, "success_url"), None);
}

#[tokio::test]
async fn test_retrieve_session_expands_payment_intent() {
    let (stand_in, base) = stripe_stand_in().await;
    let client = StripeClient::new(&test_config(&base).stripe).unwrap();

    let snapshot = client
        .retrieve_session(&CheckoutSessionId::new("cs_test_paid"))
        .await
        .unwrap();

    assert_eq!(snapshot.status, Some(CheckoutSessionStatus::Complete));
    assert_eq!(snapshot.payment_status, Some(SessionPaymentStatus::Paid));
    let intent = snapshot.payment_intent.unwrap();
    assert_eq!(intent.id.as_str(), "pi_3abc");
    assert_eq!(intent.status, Some(PaymentIntentStatus::Succeeded));

    let query = stand_in.seen()[0].query.clone().unwrap_or_default();
    assert!(query.contains("payment_intent"), "query was {query:?}");
}

#[tokio::test]
async fn test_stripe_error_body_becomes_api_error() {
    let (_stand_in, base) = stripe_stand_in().await;
    let client = StripeClient::new(&test_config(&base).stripe).unwrap();

    let err = client
        .retrieve_session(&CheckoutSessionId::new("cs_gone"))
        .await
        .unwrap_err();

    match err {
        PaymentError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "No such checkout.session: 'cs_gone'");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_storefront_through_stripe_stand_in() {
    let (stand_in, base) = stripe_stand_in().await;
    let state = AppState::new(test_config(&base)).unwrap();
    let app = fresh_market_storefront::router(state);

    let resp = post_json(
        app.clone(),
        "/api/create-checkout-session",
        &json!({
            "items": [{
                "name": "Artisan Sourdough Bread",
                "subtitle": "Bakery",
                "color": "Bakery",
                "size": "1",
                "price": 6.99,
                "quantity": 1,
                "image": ""
            }],
            "uiMode": "hosted"
        }),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["sessionId"], "cs_test_hosted");

    let form = &stand_in.seen()[0].form;
    assert_eq!(
        field(form, "line_items[0][price_data][product_data][images][0]"),
        None
    );
    assert_eq!(field(form, "metadata[subtotal]"), Some("6.99"));

    let resp = post_json(app, "/api/session-status", &json!({ "session_id": "cs_test_paid" })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["payment_intent_id"], Value::from("pi_3abc"));
}
