//! In-memory payment provider for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fresh_market_core::CheckoutSessionId;

use super::{
    CheckoutSessionRequest, CreatedSession, PaymentError, PaymentProvider, SessionMode,
    SessionSnapshot,
};

/// Payment provider that records every request and answers from memory.
///
/// Created sessions get sequential ids (`cs_test_1`, `cs_test_2`, ...).
/// Hosted sessions get a `url`, embedded ones a `client_secret`.
#[derive(Debug, Default)]
pub struct FakePaymentProvider {
    counter: AtomicUsize,
    requests: Mutex<Vec<CheckoutSessionRequest>>,
    retrieved: Mutex<Vec<CheckoutSessionId>>,
    sessions: Mutex<HashMap<String, SessionSnapshot>>,
    failure: Mutex<Option<(u16, String)>>,
}

impl FakePaymentProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a processor error.
    pub fn fail_with(&self, status: u16, message: impl Into<String>) {
        *lock(&self.failure) = Some((status, message.into()));
    }

    /// Register the snapshot returned for a session id.
    pub fn insert_session(&self, id: impl Into<String>, snapshot: SessionSnapshot) {
        lock(&self.sessions).insert(id.into(), snapshot);
    }

    /// Every create request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        lock(&self.requests).clone()
    }

    /// Every session id looked up so far.
    #[must_use]
    pub fn retrieved(&self) -> Vec<CheckoutSessionId> {
        lock(&self.retrieved).clone()
    }

    fn check_failure(&self) -> Result<(), PaymentError> {
        match lock(&self.failure).clone() {
            Some((status, message)) => Err(PaymentError::Api { status, message }),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl PaymentProvider for FakePaymentProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CreatedSession, PaymentError> {
        lock(&self.requests).push(request.clone());
        self.check_failure()?;

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("cs_test_{n}");

        let (url, client_secret) = match request.mode {
            SessionMode::Hosted { .. } => (Some(format!("https://checkout.test/pay/{id}")), None),
            SessionMode::Embedded { .. } => (None, Some(format!("{id}_secret_{n}"))),
        };

        Ok(CreatedSession {
            id: CheckoutSessionId::new(id),
            url,
            client_secret,
        })
    }

    async fn retrieve_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<SessionSnapshot, PaymentError> {
        lock(&self.retrieved).push(session_id.clone());
        self.check_failure()?;

        lock(&self.sessions)
            .get(session_id.as_str())
            .cloned()
            .ok_or_else(|| PaymentError::Api {
                status: 404,
                message: format!("No such checkout.session: '{session_id}'"),
            })
    }
}
