// src/application/services/token.rs
use crate::application::{
    ApplicationResult,
    dto::{BEARER, TokenGrant, TokenResponse},
    error::ApplicationError,
    ports::{AuthorizationCodeStorePort, ClientRegistryPort, ClockPort, CodeGeneratorPort, TokenSignerPort},
};
use crate::domain::{client::RegisteredClient, code::RedemptionAttempt, token::IdTokenClaims};
use chrono::Duration;
use std::sync::Arc;

pub const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

/// Back-channel half of the provider: the token endpoint.
pub struct TokenService {
    clients: Arc<ClientRegistryPort>,
    codes: Arc<AuthorizationCodeStorePort>,
    signer: Arc<TokenSignerPort>,
    generator: Arc<CodeGeneratorPort>,
    clock: Arc<ClockPort>,
    issuer: String,
    token_ttl: Duration,
}

impl TokenService {
    pub fn new(
        clients: Arc<ClientRegistryPort>,
        codes: Arc<AuthorizationCodeStorePort>,
        signer: Arc<TokenSignerPort>,
        generator: Arc<CodeGeneratorPort>,
        clock: Arc<ClockPort>,
        issuer: String,
        token_ttl: Duration,
    ) -> Self {
        Self {
            clients,
            codes,
            signer,
            generator,
            clock,
            issuer,
            token_ttl,
        }
    }

    /// Redeem a code for tokens. A non-positive token lifetime is refused
    /// before any code is consumed.
    pub async fn exchange(&self, grant: TokenGrant) -> ApplicationResult<TokenResponse> {
        if self.token_ttl <= Duration::zero() {
            tracing::error!(ttl = self.token_ttl.num_seconds(), "token lifetime is not positive");
            return Err(ApplicationError::infrastructure("token lifetime must be positive"));
        }

        let grant_type = required(grant.grant_type, "grant_type")?;
        if grant_type != AUTHORIZATION_CODE_GRANT {
            return Err(ApplicationError::malformed(format!(
                "unsupported grant_type {grant_type}"
            )));
        }
        let code = required(grant.code, "code")?;
        let redirect_uri = required(grant.redirect_uri, "redirect_uri")?;

        let client =
            self.authenticate_client(grant.client_id.as_deref(), grant.client_secret.as_deref())?;

        let now = self.clock.now();
        let attempt = RedemptionAttempt {
            client_id: &client.client_id,
            redirect_uri: &redirect_uri,
            code_verifier: grant.code_verifier.as_deref(),
        };
        let redeemed = self
            .codes
            .redeem(&code, &attempt, now)
            .await
            .inspect_err(|err| {
                tracing::warn!(client_id = %client.client_id, error = %err, "token request rejected");
            })?;

        let claims = IdTokenClaims::new(
            &self.issuer,
            &redeemed.subject,
            &client.client_id,
            now,
            self.token_ttl,
            redeemed.nonce,
        );
        let id_token = self.signer.sign_token(&claims)?;

        tracing::info!(client_id = %client.client_id, subject = %redeemed.subject, "tokens issued");

        Ok(TokenResponse {
            access_token: self.generator.generate_code(),
            token_type: BEARER.into(),
            id_token,
            expires_in: self.token_ttl.num_seconds(),
        })
    }

    fn authenticate_client(
        &self,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> ApplicationResult<RegisteredClient> {
        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            return Err(ApplicationError::unauthorized_client("client credentials missing"));
        };

        let client = self
            .clients
            .find(client_id)
            .ok_or_else(|| ApplicationError::unauthorized_client(format!("unknown client {client_id}")))?;

        if !client.secret_matches(client_secret) {
            tracing::warn!(client_id, "client secret mismatch");
            return Err(ApplicationError::unauthorized_client("client authentication failed"));
        }

        Ok(client)
    }
}

fn required(value: Option<String>, name: &str) -> ApplicationResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::malformed(format!("missing required parameter: {name}")))
}
