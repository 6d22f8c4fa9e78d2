// src/application/ports/tickets.rs
use crate::application::ApplicationResult;
use crate::domain::authorization::{AttemptState, AuthorizationRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Short-lived single-use records keyed by an opaque random ticket.
#[async_trait]
pub trait TicketStore<V>: Send + Sync
where
    V: Send + 'static,
{
    async fn put(&self, ticket: String, value: V, expires_at: DateTime<Utc>) -> ApplicationResult<()>;
    /// Remove and return the value if present and not yet expired.
    async fn take(&self, ticket: &str, now: DateTime<Utc>) -> ApplicationResult<Option<V>>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}

/// An authenticated user waiting for the consent decision.
#[derive(Debug, Clone)]
pub struct PendingConsent {
    pub request: AuthorizationRequest,
    pub subject: String,
    /// `Authenticating` until the user decides.
    pub state: AttemptState,
}

/// Relying-party side: what the callback needs to finish a login it started.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub nonce: String,
    pub code_verifier: String,
}
