// src/server.rs
//! Process wiring shared by the two binaries.
use crate::application::{
    ApplicationResult,
    ports::{
        AuthorizationCodeStorePort, ClientRegistryPort, ClockPort, CodeGeneratorPort,
        ConsentStorePort, CredentialVerifierPort, IdTokenVerifierPort, LoginStorePort,
        ProviderClientPort, TokenSignerPort,
    },
    services::{
        ProviderDependencies, ProviderServices, ProviderSettings, RelyingPartyService,
        RelyingPartySettings,
    },
};
use crate::config::{ProviderConfig, RelyingPartyConfig};
use crate::domain::client::RegisteredClient;
use crate::infrastructure::{
    clients::StaticClientRegistry,
    http_client::ReqwestProviderClient,
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore,
        code::RandomCodeGenerator,
        password::Argon2CredentialStore,
        ticket_store::InMemoryTicketStore,
        token::{Ed25519TokenSigner, JwksIdTokenVerifier},
    },
    time::SystemClock,
};
use anyhow::Result;
use axum::Router;
use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOGIN_TTL_MINUTES: i64 = 10;
/// How often the relying party drops abandoned logins.
pub const LOGIN_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

/// Build the provider's services from configuration: one registered client,
/// one demo account, in-memory stores.
pub fn provider_services(config: &ProviderConfig) -> Result<Arc<ProviderServices>> {
    let signer = match config.signing_key() {
        Some(seed) => Ed25519TokenSigner::from_base64_seed(seed)?,
        None => {
            tracing::warn!("IDP_SIGNING_KEY not set, using a per-process signing key");
            Ed25519TokenSigner::generate()?
        }
    };
    tracing::info!(kid = signer.kid(), "signing key loaded");

    let (user, password) = config.demo_user();
    let credentials = Argon2CredentialStore::new().with_user(user, password)?;

    let client = RegisteredClient::new(
        config.client_id(),
        config.client_secret(),
        config.redirect_uris().to_vec(),
    );

    let clients: Arc<ClientRegistryPort> = Arc::new(StaticClientRegistry::new([client]));
    let credentials: Arc<CredentialVerifierPort> = Arc::new(credentials);
    let codes: Arc<AuthorizationCodeStorePort> = Arc::new(InMemoryAuthorizationCodeStore::new());
    let consents: Arc<ConsentStorePort> = Arc::new(InMemoryTicketStore::new());
    let generator: Arc<CodeGeneratorPort> = Arc::new(RandomCodeGenerator);
    let signer: Arc<TokenSignerPort> = Arc::new(signer);
    let clock: Arc<ClockPort> = Arc::new(SystemClock);

    let settings = ProviderSettings {
        issuer: config.issuer().to_string(),
        code_ttl: chrono::Duration::from_std(config.code_ttl())?,
        consent_ttl: chrono::Duration::from_std(config.consent_ttl())?,
        token_ttl: chrono::Duration::from_std(config.token_ttl())?,
    };

    Ok(Arc::new(ProviderServices::new(
        ProviderDependencies {
            clients,
            credentials,
            codes,
            consents,
            generator,
            signer,
            clock,
        },
        settings,
    )))
}

/// Run `purge` every `every` for the life of the process. `what` names the
/// records in the logs.
pub fn spawn_sweeper<F, Fut>(what: &'static str, every: Duration, purge: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ApplicationResult<usize>> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match purge().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, what, "purged expired records"),
                Err(err) => tracing::warn!(error = %err, what, "purge failed"),
            }
        }
    });
}

pub fn relying_party_service(config: &RelyingPartyConfig) -> Result<Arc<RelyingPartyService>> {
    let provider: Arc<ProviderClientPort> = Arc::new(ReqwestProviderClient::new(
        config.token_url(),
        config.jwks_url(),
        config.http_timeout(),
    )?);
    let verifier: Arc<IdTokenVerifierPort> =
        Arc::new(JwksIdTokenVerifier::new(config.issuer(), config.client_id()));
    let logins: Arc<LoginStorePort> = Arc::new(InMemoryTicketStore::new());

    let settings = RelyingPartySettings {
        client_id: config.client_id().to_string(),
        client_secret: config.client_secret().to_string(),
        redirect_uri: config.redirect_uri().to_string(),
        authorize_url: config.authorize_url().to_string(),
        login_ttl: chrono::Duration::minutes(LOGIN_TTL_MINUTES),
    };

    Ok(Arc::new(RelyingPartyService::new(
        settings,
        logins,
        provider,
        verifier,
        Arc::new(RandomCodeGenerator),
        Arc::new(SystemClock),
    )))
}

/// Bind and serve until a shutdown signal arrives. Connect info is attached
/// so per-IP rate limiting can see the peer address.
pub async fn serve(addr: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
