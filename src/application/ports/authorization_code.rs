// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::code::{AuthorizationCode, RedemptionAttempt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    async fn create_code(&self, code: AuthorizationCode) -> ApplicationResult<()>;
    /// Check `attempt` against the stored code and mark it used, atomically.
    /// Of two concurrent calls for the same code at most one returns `Ok`.
    async fn redeem(
        &self,
        code: &str,
        attempt: &RedemptionAttempt<'_>,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationCode>;
    /// Drop codes whose expiry has passed; returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}
