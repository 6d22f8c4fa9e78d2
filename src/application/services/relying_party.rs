// src/application/services/relying_party.rs
use crate::application::{
    ApplicationResult,
    dto::{CallbackParams, VerifiedLogin},
    error::ApplicationError,
    ports::{
        ClockPort, CodeGeneratorPort, IdTokenVerifierPort, LoginStorePort, ProviderClientPort,
        tickets::PendingLogin, upstream::CodeExchange,
    },
};
use crate::domain::authorization::{OPENID_SCOPE, PkceChallenge, ResponseType};
use chrono::Duration;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct RelyingPartySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub login_ttl: Duration,
}

/// Client side of the flow: starts the authorization request and finishes
/// it on callback with the back-channel exchange and ID token checks.
pub struct RelyingPartyService {
    settings: RelyingPartySettings,
    logins: Arc<LoginStorePort>,
    provider: Arc<ProviderClientPort>,
    verifier: Arc<IdTokenVerifierPort>,
    generator: Arc<CodeGeneratorPort>,
    clock: Arc<ClockPort>,
}

impl RelyingPartyService {
    pub fn new(
        settings: RelyingPartySettings,
        logins: Arc<LoginStorePort>,
        provider: Arc<ProviderClientPort>,
        verifier: Arc<IdTokenVerifierPort>,
        generator: Arc<CodeGeneratorPort>,
        clock: Arc<ClockPort>,
    ) -> Self {
        Self {
            settings,
            logins,
            provider,
            verifier,
            generator,
            clock,
        }
    }

    /// Build the provider authorization URL for a fresh login attempt.
    pub async fn begin(&self) -> ApplicationResult<Url> {
        let state = self.generator.generate_code();
        let nonce = self.generator.generate_code();
        let code_verifier = self.generator.generate_code();
        let challenge = PkceChallenge::s256_from_verifier(&code_verifier);

        let mut url = Url::parse(&self.settings.authorize_url)
            .map_err(|err| ApplicationError::infrastructure(format!("authorize url: {err}")))?;
        url.query_pairs_mut()
            .append_pair("scope", OPENID_SCOPE)
            .append_pair("response_type", ResponseType::Code.as_str())
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri)
            .append_pair("state", &state)
            .append_pair("nonce", &nonce)
            .append_pair("code_challenge", &challenge.challenge)
            .append_pair("code_challenge_method", challenge.method.as_str());

        self.logins
            .put(
                state,
                PendingLogin {
                    nonce,
                    code_verifier,
                },
                self.clock.after(self.settings.login_ttl),
            )
            .await?;

        Ok(url)
    }

    /// Drop logins whose callback never arrived.
    pub async fn purge_expired(&self) -> ApplicationResult<usize> {
        self.logins.purge_expired(self.clock.now()).await
    }

    /// Handle the provider's redirect back to us.
    pub async fn complete(&self, callback: CallbackParams) -> ApplicationResult<VerifiedLogin> {
        let state = callback
            .state
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApplicationError::malformed("missing state"))?;
        let pending = self
            .logins
            .take(&state, self.clock.now())
            .await?
            .ok_or_else(|| ApplicationError::malformed("unknown or expired state"))?;

        if let Some(error) = callback.error {
            tracing::info!(%error, "provider returned an authorization error");
            return Err(if error == "access_denied" {
                ApplicationError::AccessDenied
            } else {
                ApplicationError::UpstreamRejected(error)
            });
        }

        let code = callback
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApplicationError::malformed("missing code"))?;

        let exchange = CodeExchange {
            code,
            redirect_uri: self.settings.redirect_uri.clone(),
            client_id: self.settings.client_id.clone(),
            client_secret: self.settings.client_secret.clone(),
            code_verifier: Some(pending.code_verifier),
        };
        let token = self.provider.exchange_code(&exchange).await?;

        let keys = self.provider.fetch_key_set().await?;
        let claims = self
            .verifier
            .verify(&token.id_token, &keys, Some(&pending.nonce))?;

        tracing::info!(subject = %claims.sub, issuer = %claims.iss, "login completed");
        Ok(VerifiedLogin { claims, token })
    }
}
