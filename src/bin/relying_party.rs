use anyhow::Result;
use oidc_codeflow::config::RelyingPartyConfig;
use oidc_codeflow::presentation::http::{
    routes::build_relying_party_router, state::RelyingPartyState,
};
use oidc_codeflow::server;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    server::init_tracing();

    let config = RelyingPartyConfig::from_env()?;
    let relying_party = server::relying_party_service(&config)?;
    let sweep = Arc::clone(&relying_party);
    server::spawn_sweeper("logins", server::LOGIN_SWEEP_INTERVAL, move || {
        let relying_party = Arc::clone(&sweep);
        async move { relying_party.purge_expired().await }
    });

    tracing::info!(
        issuer = config.issuer(),
        client_id = config.client_id(),
        "relying party starting"
    );
    let app = build_relying_party_router(RelyingPartyState { relying_party });
    server::serve(config.listen_addr(), app).await
}
