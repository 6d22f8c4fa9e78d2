// src/infrastructure/security/authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::authorization_code::AuthorizationCodeStore;
use crate::domain::code::{AuthorizationCode, GrantRejection, RedemptionAttempt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct InMemoryAuthorizationCodeStore {
    // code value -> record; used codes stay until they expire so replays are recognised
    inner: Mutex<HashMap<String, AuthorizationCode>>,
}

impl InMemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, AuthorizationCode>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::infrastructure("authorization code store poisoned"))
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn create_code(&self, code: AuthorizationCode) -> ApplicationResult<()> {
        let mut guard = self.lock()?;
        guard.insert(code.value.clone(), code);
        Ok(())
    }

    async fn redeem(
        &self,
        code: &str,
        attempt: &RedemptionAttempt<'_>,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationCode> {
        let mut guard = self.lock()?;
        let Some(record) = guard.get_mut(code) else {
            return Err(GrantRejection::Unknown.into());
        };

        if let Err(rejection) = record.admit(attempt, now) {
            match rejection {
                GrantRejection::AlreadyUsed => {
                    tracing::warn!(client_id = %record.client_id, "authorization code replay");
                }
                GrantRejection::Expired => {
                    guard.remove(code);
                }
                _ => {}
            }
            return Err(rejection.into());
        }

        record.used = true;
        Ok(record.clone())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, record| !record.is_expired(now));
        Ok(before - guard.len())
    }
}
