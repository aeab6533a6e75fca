//! HTTP client for the storefront's own checkout API.

use async_trait::async_trait;
use fresh_market_core::{
    CheckoutSessionReply, CreateCheckoutSessionBody, SessionStatusBody, SessionStatusReply,
};
use thiserror::Error;
use url::Url;

/// Message used when the server gives no reason for a failed session.
pub const CREATE_SESSION_FAILED: &str = "Failed to create checkout session";

/// Errors from calls to the checkout API.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error body or status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Base URL cannot be joined with an API path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The two checkout endpoints, as seen from a client.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// `POST /api/create-checkout-session`.
    async fn create_session(
        &self,
        body: &CreateCheckoutSessionBody,
    ) -> Result<CheckoutSessionReply, ApiClientError>;

    /// `POST /api/session-status`.
    async fn session_status(&self, session_id: &str) -> Result<SessionStatusReply, ApiClientError>;
}

/// Checkout API client over HTTP.
#[derive(Debug, Clone)]
pub struct StorefrontApiClient {
    client: reqwest::Client,
    base: Url,
}

impl StorefrontApiClient {
    /// Create a client for the server at `base` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base: Url) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base })
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(u16, serde_json::Value), ApiClientError> {
        let url = self.base.join(path)?;
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let value = serde_json::from_str(&text).map_err(|e| {
            if (200..300).contains(&status) {
                ApiClientError::Parse(e.to_string())
            } else {
                ApiClientError::Api {
                    status,
                    message: format!("Request failed with status {status}"),
                }
            }
        })?;
        Ok((status, value))
    }
}

#[async_trait]
impl CheckoutApi for StorefrontApiClient {
    #[tracing::instrument(skip(self, body))]
    async fn create_session(
        &self,
        body: &CreateCheckoutSessionBody,
    ) -> Result<CheckoutSessionReply, ApiClientError> {
        let (status, value) = self
            .post_json("api/create-checkout-session", body)
            .await
            .map_err(|e| match e {
                ApiClientError::Api { status, .. } => ApiClientError::Api {
                    status,
                    message: CREATE_SESSION_FAILED.to_string(),
                },
                other => other,
            })?;

        let reply: CheckoutSessionReply =
            serde_json::from_value(value).map_err(|e| ApiClientError::Parse(e.to_string()))?;

        if !(200..300).contains(&status) || reply.error.is_some() {
            return Err(ApiClientError::Api {
                status,
                message: reply
                    .error
                    .unwrap_or_else(|| CREATE_SESSION_FAILED.to_string()),
            });
        }
        Ok(reply)
    }

    #[tracing::instrument(skip(self))]
    async fn session_status(&self, session_id: &str) -> Result<SessionStatusReply, ApiClientError> {
        let body = SessionStatusBody {
            session_id: Some(session_id.to_string()),
        };
        let (status, value) = self.post_json("api/session-status", &body).await?;

        let reply: SessionStatusReply =
            serde_json::from_value(value).map_err(|e| ApiClientError::Parse(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ApiClientError::Api {
                status,
                message: reply
                    .error
                    .unwrap_or_else(|| format!("Request failed with status {status}")),
            });
        }
        Ok(reply)
    }
}
