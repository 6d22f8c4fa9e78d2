// tests/support/mocks.rs
use async_trait::async_trait;
use oidc_codeflow::application::{
    ApplicationResult,
    ports::security::{CodeGenerator, CredentialVerifier},
};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const USER_ID: &str = "userid";
pub const PASSWORD: &str = "passwd";

/// Plain-text credential check; keeps tests clear of Argon2 cost.
pub struct PlainCredentials;

#[async_trait]
impl CredentialVerifier for PlainCredentials {
    async fn verify(&self, id: &str, password: &str) -> ApplicationResult<bool> {
        Ok(id == USER_ID && password == PASSWORD)
    }
}

/// Predictable values: `value-1`, `value-2`, ...
#[derive(Default)]
pub struct SequenceCodeGenerator {
    next: AtomicUsize,
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate_code(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        format!("value-{n}")
    }
}
