//! Client-side checkout state machine.
//!
//! ```text
//! Idle ──begin──▶ Requesting ──▶ Ready ──submit──▶ Submitting ──▶ Redirected ──resolve──▶ Resolved
//!                      │           ▲                    │
//!                      ▼           └──── message ───────┘
//!                    Failed
//! ```

use fresh_market_core::{CheckoutSessionId, CheckoutSummary, Email, UiMode};

use super::client::{ApiClientError, CheckoutApi};
use super::status_page::{StatusView, resolve_session};
use super::widget::{PaymentWidget, WidgetState};
use crate::cart::{CartStorage, CartStore};

/// Message shown when the server accepts a session but returns no secret.
pub const MISSING_CLIENT_SECRET: &str = "No client secret returned from server";

/// An embedded payment session ready for the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSession {
    pub session_id: CheckoutSessionId,
    pub client_secret: String,
}

/// A processor-hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSession {
    pub session_id: CheckoutSessionId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Requesting,
    Ready {
        session: EmbeddedSession,
        /// Field-level error for the email input.
        email_error: Option<String>,
        /// Form-level message from a failed confirmation.
        message: Option<String>,
    },
    Submitting {
        session: EmbeddedSession,
    },
    Redirected {
        session_id: CheckoutSessionId,
        return_path: String,
    },
    Failed {
        message: String,
    },
    Resolved(StatusView),
}

/// Path the shopper lands on after paying.
#[must_use]
pub fn return_path(session_id: &CheckoutSessionId) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("session_id", session_id.as_str())
        .finish();
    format!("/checkout/success?{query}")
}

/// Drives one checkout from session creation to the status page.
pub struct CheckoutFlow<A> {
    api: A,
    state: CheckoutState,
}

impl<A: CheckoutApi> CheckoutFlow<A> {
    pub const fn new(api: A) -> Self {
        Self {
            api,
            state: CheckoutState::Idle,
        }
    }

    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Request an embedded session for `summary`. Ends in `Ready` or `Failed`.
    #[tracing::instrument(skip_all, fields(lines = summary.items.len()))]
    pub async fn begin(&mut self, summary: &CheckoutSummary) -> &CheckoutState {
        self.state = CheckoutState::Requesting;

        let body = summary.to_request(UiMode::Embedded);
        self.state = match self.api.create_session(&body).await {
            Ok(reply) => match (reply.session_id, reply.client_secret) {
                (Some(session_id), Some(client_secret)) if !client_secret.is_empty() => {
                    CheckoutState::Ready {
                        session: EmbeddedSession {
                            session_id: CheckoutSessionId::new(session_id),
                            client_secret,
                        },
                        email_error: None,
                        message: None,
                    }
                }
                _ => CheckoutState::Failed {
                    message: MISSING_CLIENT_SECRET.to_string(),
                },
            },
            Err(e) => failed(&e),
        };
        &self.state
    }

    /// Request a hosted session for `summary`. On success the flow is
    /// `Redirected` and the caller sends the shopper to the returned URL.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be created or has no URL.
    #[tracing::instrument(skip_all, fields(lines = summary.items.len()))]
    pub async fn begin_hosted(
        &mut self,
        summary: &CheckoutSummary,
    ) -> Result<HostedSession, ApiClientError> {
        self.state = CheckoutState::Requesting;

        let body = summary.to_request(UiMode::Hosted);
        let result = self.api.create_session(&body).await.and_then(|reply| {
            match (reply.session_id, reply.url) {
                (Some(session_id), Some(url)) => Ok(HostedSession {
                    session_id: CheckoutSessionId::new(session_id),
                    url,
                }),
                _ => Err(ApiClientError::Parse(
                    "No redirect URL returned from server".to_string(),
                )),
            }
        });

        match result {
            Ok(session) => {
                self.state = CheckoutState::Redirected {
                    return_path: return_path(&session.session_id),
                    session_id: session.session_id.clone(),
                };
                Ok(session)
            }
            Err(e) => {
                self.state = failed(&e);
                Err(e)
            }
        }
    }

    /// Email field lost focus: let the widget validate the address.
    pub async fn check_email<W: PaymentWidget>(&mut self, widget: &mut W, email: &str) {
        let CheckoutState::Ready { email_error, .. } = &mut self.state else {
            return;
        };
        if email.is_empty() {
            return;
        }
        if let Err(e) = widget.update_email(email).await {
            *email_error = Some(e.message);
        }
    }

    /// Email input changed: the previous field error no longer applies.
    pub fn email_changed(&mut self) {
        if let CheckoutState::Ready { email_error, .. } = &mut self.state {
            *email_error = None;
        }
    }

    /// Submit the payment form.
    ///
    /// Outside `Ready`, or while the widget is still loading, this does
    /// nothing.
    #[tracing::instrument(skip_all)]
    pub async fn submit<W: PaymentWidget>(&mut self, widget: &mut W, email: &str) -> &CheckoutState {
        let CheckoutState::Ready { session, .. } = &self.state else {
            return &self.state;
        };
        let session = session.clone();

        match widget.state() {
            WidgetState::Loading => return &self.state,
            WidgetState::Error(message) => {
                self.state = CheckoutState::Failed {
                    message: format!("Error: {message}"),
                };
                return &self.state;
            }
            WidgetState::Ready => {}
        }

        if let Err(e) = Email::parse(email) {
            self.state = CheckoutState::Ready {
                session,
                email_error: Some(e.form_message().to_string()),
                message: None,
            };
            return &self.state;
        }

        self.state = CheckoutState::Submitting {
            session: session.clone(),
        };

        let path = return_path(&session.session_id);
        self.state = match widget.confirm(&path).await {
            Ok(()) => CheckoutState::Redirected {
                session_id: session.session_id,
                return_path: path,
            },
            Err(e) => {
                tracing::info!(error = %e, "Payment confirmation rejected");
                CheckoutState::Ready {
                    session,
                    email_error: None,
                    message: Some(e.message),
                }
            }
        };
        &self.state
    }

    /// Look up the outcome on the status page. A successful payment empties
    /// the cart.
    #[tracing::instrument(skip_all)]
    pub async fn resolve<S: CartStorage>(
        &mut self,
        session_id: Option<&str>,
        cart: &mut CartStore<S>,
    ) -> StatusView {
        let view = resolve_session(&self.api, session_id).await;
        if view.is_success() {
            cart.clear();
        }
        self.state = CheckoutState::Resolved(view.clone());
        view
    }
}

fn failed(error: &ApiClientError) -> CheckoutState {
    tracing::warn!(%error, "Checkout session request failed");
    CheckoutState::Failed {
        message: error.to_string(),
    }
}
