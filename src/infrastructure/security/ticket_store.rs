// src/infrastructure/security/ticket_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::tickets::TicketStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Single-use expiring records. Backs consent tickets on the provider and
/// pending logins (keyed by `state`) on the relying party.
pub struct InMemoryTicketStore<V> {
    inner: Mutex<HashMap<String, (V, DateTime<Utc>)>>,
}

impl<V> Default for InMemoryTicketStore<V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> InMemoryTicketStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, (V, DateTime<Utc>)>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::infrastructure("ticket store poisoned"))
    }
}

#[async_trait]
impl<V> TicketStore<V> for InMemoryTicketStore<V>
where
    V: Send + 'static,
{
    async fn put(&self, ticket: String, value: V, expires_at: DateTime<Utc>) -> ApplicationResult<()> {
        self.lock()?.insert(ticket, (value, expires_at));
        Ok(())
    }

    async fn take(&self, ticket: &str, now: DateTime<Utc>) -> ApplicationResult<Option<V>> {
        let entry = self.lock()?.remove(ticket);
        Ok(entry.and_then(|(value, expires_at)| (now < expires_at).then_some(value)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, (_, expires_at)| now < *expires_at);
        Ok(before - guard.len())
    }
}
