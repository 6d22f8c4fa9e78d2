// src/application/services/mod.rs
pub mod authorization;
pub mod relying_party;
pub mod token;

use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        ports::{
            AuthorizationCodeStorePort, ClientRegistryPort, ClockPort, CodeGeneratorPort,
            ConsentStorePort, CredentialVerifierPort, TokenSignerPort,
        },
    },
    domain::token::JsonWebKeySet,
};
use chrono::Duration;

pub use authorization::AuthorizationService;
pub use relying_party::{RelyingPartyService, RelyingPartySettings};
pub use token::TokenService;

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub issuer: String,
    pub code_ttl: Duration,
    pub consent_ttl: Duration,
    pub token_ttl: Duration,
}

pub struct ProviderDependencies {
    pub clients: Arc<ClientRegistryPort>,
    pub credentials: Arc<CredentialVerifierPort>,
    pub codes: Arc<AuthorizationCodeStorePort>,
    pub consents: Arc<ConsentStorePort>,
    pub generator: Arc<CodeGeneratorPort>,
    pub signer: Arc<TokenSignerPort>,
    pub clock: Arc<ClockPort>,
}

/// Everything the identity provider's HTTP layer talks to.
pub struct ProviderServices {
    pub authorization: Arc<AuthorizationService>,
    pub tokens: Arc<TokenService>,
    signer: Arc<TokenSignerPort>,
    codes: Arc<AuthorizationCodeStorePort>,
    consents: Arc<ConsentStorePort>,
    clock: Arc<ClockPort>,
    issuer: String,
}

impl ProviderServices {
    pub fn new(deps: ProviderDependencies, settings: ProviderSettings) -> Self {
        let issuer = settings.issuer.trim_end_matches('/').to_string();

        let authorization = Arc::new(AuthorizationService::new(
            Arc::clone(&deps.clients),
            Arc::clone(&deps.credentials),
            Arc::clone(&deps.consents),
            Arc::clone(&deps.codes),
            Arc::clone(&deps.generator),
            Arc::clone(&deps.clock),
            settings.code_ttl,
            settings.consent_ttl,
        ));

        let tokens = Arc::new(TokenService::new(
            Arc::clone(&deps.clients),
            Arc::clone(&deps.codes),
            Arc::clone(&deps.signer),
            Arc::clone(&deps.generator),
            Arc::clone(&deps.clock),
            issuer.clone(),
            settings.token_ttl,
        ));

        Self {
            authorization,
            tokens,
            signer: deps.signer,
            codes: deps.codes,
            consents: deps.consents,
            clock: deps.clock,
            issuer,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn key_set(&self) -> JsonWebKeySet {
        self.signer.key_set()
    }

    /// Remove expired codes and consent tickets. Correctness never depends on
    /// this running; expiry is also checked on every lookup.
    pub async fn purge_expired(&self) -> ApplicationResult<usize> {
        let now = self.clock.now();
        let codes = self.codes.purge_expired(now).await?;
        let tickets = self.consents.purge_expired(now).await?;
        Ok(codes + tickets)
    }
}
