//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//! GET  /config.json                  - Publishable key for the payment widget
//!
//! # Checkout API (POST only, JSON in and out)
//! POST /api/create-checkout-session  - Create a hosted or embedded session
//! POST /api/session-status           - Look up a session's payment status
//! ```
//!
//! Other methods under `/api` get 405 and unknown paths get 404, both with a
//! JSON `{"error": ...}` body.

pub mod checkout;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the checkout API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session).fallback(checkout::method_not_allowed),
        )
        .route(
            "/session-status",
            post(checkout::session_status).fallback(checkout::method_not_allowed),
        )
        .fallback(checkout::api_fallback)
}

/// Build the complete application router with its middleware.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().fallback_origin);

    Router::new()
        .route("/health", get(health))
        .route("/config.json", get(checkout::client_config))
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(cors)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the processor.
pub async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Allow the web client's dev server to call the API directly.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET])
        .allow_headers([CONTENT_TYPE]);
    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, origin, "Fallback origin is not a valid header value");
            layer
        }
    }
}
