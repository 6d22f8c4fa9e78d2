// src/application/ports/time.rs
use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn after(&self, ttl: Duration) -> DateTime<Utc> {
        self.now() + ttl
    }
}
