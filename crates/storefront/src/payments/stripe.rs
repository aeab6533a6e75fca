//! Stripe Checkout Sessions over REST.
//!
//! Requests are form-encoded with Stripe's bracketed key convention
//! (`line_items[0][price_data][unit_amount]=699`). Responses are JSON.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

use async_trait::async_trait;
use fresh_market_core::{
    CheckoutSessionId, CheckoutSessionStatus, PaymentIntentId, PaymentIntentStatus,
    SessionPaymentStatus,
};

use super::{
    CheckoutSessionRequest, CreatedSession, PaymentError, PaymentIntentSummary, PaymentProvider,
    SessionMode, SessionSnapshot,
};
use crate::config::StripeConfig;

const SESSIONS_PATH: &str = "v1/checkout/sessions";

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: Url,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns error if the key or version cannot be sent as a header, or if
    /// the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentError::Parse(format!("Invalid API key format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("Authorization", auth);

        headers.insert(
            "Stripe-Version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| PaymentError::Parse(format!("Invalid API version: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    fn sessions_url(&self, session_id: Option<&CheckoutSessionId>) -> Result<Url, PaymentError> {
        let mut url = self
            .api_base
            .join(SESSIONS_PATH)
            .map_err(|e| PaymentError::Parse(format!("Invalid API base: {e}")))?;
        if let Some(id) = session_id {
            url.path_segments_mut()
                .map_err(|()| PaymentError::Parse("API base cannot be a base".to_string()))?
                .push(id.as_str());
        }
        Ok(url)
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[tracing::instrument(skip(self, request), fields(lines = request.line_items.len()))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CreatedSession, PaymentError> {
        let url = self.sessions_url(None)?;
        let response = self
            .client
            .post(url)
            .form(&session_form(request))
            .send()
            .await?;

        let session: SessionObject = read_json(response).await?;
        tracing::debug!(session_id = %session.id, "Created checkout session");

        Ok(CreatedSession {
            id: CheckoutSessionId::new(session.id),
            url: session.url,
            client_secret: session.client_secret,
        })
    }

    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    async fn retrieve_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<SessionSnapshot, PaymentError> {
        let mut url = self.sessions_url(Some(session_id))?;
        url.query_pairs_mut()
            .append_pair("expand[]", "payment_intent");

        let response = self.client.get(url).send().await?;
        let session: SessionObject = read_json(response).await?;

        Ok(session.into_snapshot())
    }
}

/// Flatten a session request into Stripe's bracketed form fields.
fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((
            format!("{prefix}[price_data][currency]"),
            item.currency.processor_code().to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][description]"),
            item.description.clone(),
        ));
        for (j, image) in item.images.iter().enumerate() {
            form.push((
                format!("{prefix}[price_data][product_data][images][{j}]"),
                image.clone(),
            ));
        }
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    match &request.mode {
        SessionMode::Hosted {
            success_url,
            cancel_url,
        } => {
            form.push(("success_url".to_string(), success_url.clone()));
            form.push(("cancel_url".to_string(), cancel_url.clone()));
        }
        SessionMode::Embedded { return_url } => {
            form.push(("ui_mode".to_string(), "custom".to_string()));
            form.push(("return_url".to_string(), return_url.clone()));
        }
    }

    let totals = &request.metadata;
    form.push(("metadata[subtotal]".to_string(), totals.subtotal.clone()));
    form.push(("metadata[tax]".to_string(), totals.tax.clone()));
    form.push(("metadata[total]".to_string(), totals.total.clone()));

    form
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PaymentError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or_else(|| format!("Payment API request failed with status {status}"));
        tracing::warn!(status = status.as_u16(), %message, "Payment API error");
        return Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| PaymentError::Parse(e.to_string()))
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    status: Option<CheckoutSessionStatus>,
    #[serde(default)]
    payment_status: Option<SessionPaymentStatus>,
    #[serde(default)]
    payment_intent: Option<PaymentIntentField>,
}

/// `payment_intent` is an id unless expanded.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaymentIntentField {
    Id(String),
    Expanded {
        id: String,
        #[serde(default)]
        status: Option<PaymentIntentStatus>,
    },
}

impl SessionObject {
    fn into_snapshot(self) -> SessionSnapshot {
        let payment_intent = self.payment_intent.map(|field| match field {
            PaymentIntentField::Id(id) => PaymentIntentSummary {
                id: PaymentIntentId::new(id),
                status: None,
            },
            PaymentIntentField::Expanded { id, status } => PaymentIntentSummary {
                id: PaymentIntentId::new(id),
                status,
            },
        });

        SessionSnapshot {
            id: Some(CheckoutSessionId::new(self.id)),
            status: self.status,
            payment_status: self.payment_status,
            payment_intent,
        }
    }
}
