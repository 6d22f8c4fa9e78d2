use anyhow::Result;
use oidc_codeflow::config::ProviderConfig;
use oidc_codeflow::presentation::http::{
    middleware::rate_limit::credential_limiter, routes::build_provider_router, state::ProviderState,
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

    let config = ProviderConfig::from_env()?;
    let services = server::provider_services(&config)?;
    let sweep = Arc::clone(&services);
    server::spawn_sweeper("grants", config.code_ttl(), move || {
        let services = Arc::clone(&sweep);
        async move { services.purge_expired().await }
    });

    let limiter = config.rate_limit().map(credential_limiter).transpose()?;
    tracing::info!(
        issuer = %services.issuer(),
        rate_limited = limiter.is_some(),
        "identity provider starting"
    );
    let app = build_provider_router(ProviderState { services }, limiter);
    server::serve(config.listen_addr(), app).await
}
