// src/application/ports/security.rs
use crate::application::ApplicationResult;
use crate::domain::token::{IdTokenClaims, JsonWebKeySet};
use async_trait::async_trait;

/// Source of unguessable opaque values (authorization codes, access tokens,
/// consent tickets, state/nonce on the relying party).
pub trait CodeGenerator: Send + Sync {
    fn generate_code(&self) -> String;
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, id: &str, password: &str) -> ApplicationResult<bool>;
}

pub trait TokenSigner: Send + Sync {
    fn sign_token(&self, claims: &IdTokenClaims) -> ApplicationResult<String>;
    /// Public keys able to verify tokens produced by `sign_token`.
    fn key_set(&self) -> JsonWebKeySet;
}

pub trait IdTokenVerifier: Send + Sync {
    /// Verify signature, issuer, audience, expiry and (when given) nonce.
    fn verify(
        &self,
        id_token: &str,
        keys: &JsonWebKeySet,
        expected_nonce: Option<&str>,
    ) -> ApplicationResult<IdTokenClaims>;
}
