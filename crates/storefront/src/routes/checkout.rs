//! Checkout API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, header::ORIGIN},
};
use fresh_market_core::{
    CheckoutSessionCreated, CheckoutSessionId, CreateCheckoutSessionBody, SessionStatusBody,
    SessionStatusReply, UiMode,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::instrument;

use crate::checkout::build_session_request;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// `POST /api/create-checkout-session`
#[instrument(skip(state, headers, body))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutSessionCreated>> {
    let body: CreateCheckoutSessionBody = parse_body(&body)?;
    let origin = request_origin(&headers, &state.config().fallback_origin);

    let (ui_mode, request) = build_session_request(&body, &origin).map_err(|e| {
        tracing::warn!(error = %e, "Rejected checkout request");
        AppError::BadRequest(e.to_string())
    })?;

    add_breadcrumb(
        "checkout",
        "Creating checkout session",
        Some(&[("ui_mode", ui_mode.as_str()), ("total", request.metadata.total.as_str())]),
    );

    let session = state.payments().create_checkout_session(&request).await?;
    tracing::info!(
        session_id = %session.id,
        ui_mode = ui_mode.as_str(),
        total = %request.metadata.total,
        "Checkout session created"
    );

    let session_id = session.id.into_inner();
    let created = match ui_mode {
        UiMode::Hosted => CheckoutSessionCreated::Hosted {
            session_id,
            url: session.url,
        },
        UiMode::Embedded => CheckoutSessionCreated::Embedded {
            client_secret: session.client_secret,
            session_id,
        },
    };
    Ok(Json(created))
}

/// `POST /api/session-status`
#[instrument(skip(state, body))]
pub async fn session_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SessionStatusReply>> {
    let body: SessionStatusBody = parse_body(&body)?;
    let session_id = body
        .session_id
        .filter(|id| !id.is_empty())
        .map(CheckoutSessionId::new)
        .ok_or_else(|| AppError::BadRequest("session_id is required".to_string()))?;

    let session = state.payments().retrieve_session(&session_id).await?;
    let (payment_intent_id, payment_intent_status) = match session.payment_intent {
        Some(intent) => (
            Some(intent.id.into_inner()),
            intent.status.map(String::from),
        ),
        None => (None, None),
    };

    Ok(Json(SessionStatusReply {
        status: session.status.map(String::from),
        payment_status: session.payment_status.map(String::from),
        payment_intent_id,
        payment_intent_status,
        error: None,
    }))
}

/// `GET /config.json`: public settings for the browser payment widget.
pub async fn client_config(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "publishableKey": state.config().stripe.publishable_key }))
}

/// Fallback for other methods on the checkout endpoints.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Fallback for unknown paths under `/api`. Non-POST requests get 405 like
/// the known endpoints do.
pub async fn api_fallback(method: Method) -> AppError {
    if method == Method::POST {
        AppError::NotFound
    } else {
        AppError::MethodNotAllowed
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// Origin for return URLs: the request's `Origin` header, else the
/// configured fallback.
fn request_origin(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().trim_end_matches('/'))
        .filter(|v| !v.is_empty() && *v != "null")
        .unwrap_or(fallback)
        .to_string()
}
