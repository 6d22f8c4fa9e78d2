// src/application/services/authorization.rs
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        AuthorizationCodeStorePort, ClientRegistryPort, ClockPort, CodeGeneratorPort,
        ConsentStorePort, CredentialVerifierPort, tickets::PendingConsent,
    },
};
use crate::domain::{
    authorization::{AttemptState, AuthorizationParams, AuthorizationRequest},
    code::AuthorizationCode,
};
use chrono::Duration;
use std::sync::Arc;
use url::Url;

pub const ACCESS_DENIED: &str = "access_denied";

/// Front-channel half of the provider: request validation, user
/// authentication, consent and code issuance.
pub struct AuthorizationService {
    clients: Arc<ClientRegistryPort>,
    credentials: Arc<CredentialVerifierPort>,
    consents: Arc<ConsentStorePort>,
    codes: Arc<AuthorizationCodeStorePort>,
    generator: Arc<CodeGeneratorPort>,
    clock: Arc<ClockPort>,
    code_ttl: Duration,
    consent_ttl: Duration,
}

impl AuthorizationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clients: Arc<ClientRegistryPort>,
        credentials: Arc<CredentialVerifierPort>,
        consents: Arc<ConsentStorePort>,
        codes: Arc<AuthorizationCodeStorePort>,
        generator: Arc<CodeGeneratorPort>,
        clock: Arc<ClockPort>,
        code_ttl: Duration,
        consent_ttl: Duration,
    ) -> Self {
        Self {
            clients,
            credentials,
            consents,
            codes,
            generator,
            clock,
            code_ttl,
            consent_ttl,
        }
    }

    /// Validate the parameters and check the redirect URI against the
    /// client's registration. Nothing here may lead to a redirect.
    pub fn validate(&self, params: AuthorizationParams) -> ApplicationResult<AuthorizationRequest> {
        let request = AuthorizationRequest::try_from(params)?;

        let client = self.clients.find(&request.client_id).ok_or_else(|| {
            ApplicationError::unauthorized_client(format!("unknown client {}", request.client_id))
        })?;

        if !client.allows_redirect(&request.redirect_uri) {
            return Err(ApplicationError::malformed(
                "redirect_uri is not registered for this client",
            ));
        }

        Ok(request)
    }

    /// Verify the user's credentials; on success park the request behind a
    /// consent ticket and return the ticket.
    pub async fn authenticate(
        &self,
        request: AuthorizationRequest,
        id: &str,
        password: &str,
    ) -> ApplicationResult<String> {
        if !self.credentials.verify(id, password).await? {
            tracing::info!(client_id = %request.client_id, "user authentication failed");
            return Err(ApplicationError::AuthenticationFailure);
        }

        let ticket = self.generator.generate_code();
        let expires_at = self.clock.after(self.consent_ttl);
        tracing::debug!(client_id = %request.client_id, subject = %id, "awaiting consent");
        self.consents
            .put(
                ticket.clone(),
                PendingConsent {
                    request,
                    subject: id.to_string(),
                    state: AttemptState::Authenticating,
                },
                expires_at,
            )
            .await?;

        Ok(ticket)
    }

    /// Consent given: issue a code and return the callback URL carrying it.
    /// The subject and request come from the ticket alone, so only a ticket
    /// minted by a successful [`Self::authenticate`] can produce a code.
    pub async fn approve(&self, ticket: &str, redirect_uri: Option<&str>) -> ApplicationResult<Url> {
        let pending = self.take_consent(ticket, redirect_uri).await?;
        pending.state.transition(AttemptState::Granted)?;

        let now = self.clock.now();
        let code = AuthorizationCode::issue(
            self.generator.generate_code(),
            &pending.request,
            pending.subject.as_str(),
            now,
            self.code_ttl,
        );
        let value = code.value.clone();
        let state = code.state(now);
        self.codes.create_code(code).await?;

        tracing::info!(
            client_id = %pending.request.client_id,
            subject = %pending.subject,
            ?state,
            "authorization code issued"
        );

        callback_url(&pending.request, ("code", &value))
    }

    /// Consent refused: the callback URL carries `error=access_denied`.
    pub async fn deny(&self, ticket: &str, redirect_uri: Option<&str>) -> ApplicationResult<Url> {
        let pending = self.take_consent(ticket, redirect_uri).await?;
        let state = pending.state.transition(AttemptState::Denied)?;
        tracing::info!(client_id = %pending.request.client_id, ?state, "authorization denied");

        callback_url(&pending.request, ("error", ACCESS_DENIED))
    }

    async fn take_consent(
        &self,
        ticket: &str,
        redirect_uri: Option<&str>,
    ) -> ApplicationResult<PendingConsent> {
        let pending = self
            .consents
            .take(ticket, self.clock.now())
            .await?
            .ok_or_else(|| ApplicationError::malformed("unknown or expired consent ticket"))?;

        if redirect_uri.is_some_and(|uri| uri != pending.request.redirect_uri) {
            return Err(ApplicationError::malformed(
                "redirect_uri does not match the authorization request",
            ));
        }

        Ok(pending)
    }
}

fn callback_url(request: &AuthorizationRequest, pair: (&str, &str)) -> ApplicationResult<Url> {
    let mut url = Url::parse(&request.redirect_uri)
        .map_err(|err| ApplicationError::malformed(err.to_string()))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair(pair.0, pair.1);
        if let Some(state) = request.state.as_deref() {
            query.append_pair("state", state);
        }
    }
    Ok(url)
}
