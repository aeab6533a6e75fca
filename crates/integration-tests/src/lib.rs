//! Integration tests for Fresh Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fresh-market-integration-tests
//! ```
//!
//! No external services are needed. The storefront router runs in-process
//! against [`FakePaymentProvider`], either driven directly with
//! `tower::ServiceExt::oneshot` or served on an ephemeral local port.
//!
//! # Test Categories
//!
//! - `checkout_api` - HTTP contract of the checkout endpoints
//! - `checkout_flow` - client state machine against a live local server
//! - `stripe_client` - Stripe wire format against a local stand-in

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use fresh_market_storefront::config::{
    DEFAULT_FALLBACK_ORIGIN, DEFAULT_STRIPE_API_VERSION, StorefrontConfig, StripeConfig,
};
use fresh_market_storefront::payments::FakePaymentProvider;
use fresh_market_storefront::{AppState, router};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

/// Configuration pointing at `api_base`, with test keys.
#[must_use]
pub fn test_config(api_base: &Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid IP"),
        port: 0,
        fallback_origin: DEFAULT_FALLBACK_ORIGIN.to_string(),
        stripe: StripeConfig {
            secret_key: SecretString::from("sk_test_51ShiIxLlwE3MW2ahqcf5GHv1wxm1Jq"),
            publishable_key: "pk_test_51ShiIxLlwE3MW2ahqcf".to_string(),
            api_base: api_base.clone(),
            api_version: DEFAULT_STRIPE_API_VERSION.to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Router backed by `payments`.
#[must_use]
pub fn test_app(payments: Arc<FakePaymentProvider>) -> Router {
    let api_base = Url::parse("http://127.0.0.1:9").expect("valid URL");
    router(AppState::with_provider(test_config(&api_base), payments))
}

/// A response with its body decoded as JSON (`Value::Null` if not JSON).
#[derive(Debug)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Send one request through `app`.
///
/// # Panics
///
/// Panics if the request cannot be built or the router fails.
pub async fn send(app: Router, request: Request<Body>) -> JsonResponse {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    JsonResponse {
        status,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

/// `POST path` with a raw JSON body and an optional `Origin` header.
///
/// # Panics
///
/// Panics if the request cannot be built.
pub async fn post_raw(app: Router, path: &str, body: &str, origin: Option<&str>) -> JsonResponse {
    let mut builder = Request::post(path).header(CONTENT_TYPE, "application/json");
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }
    send(app, builder.body(Body::from(body.to_string())).expect("request")).await
}

/// `POST path` with a JSON value.
pub async fn post_json(app: Router, path: &str, body: &Value) -> JsonResponse {
    post_raw(app, path, &body.to_string(), None).await
}

/// Serve `app` on an ephemeral port and return its base URL.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}")).expect("valid URL")
}
