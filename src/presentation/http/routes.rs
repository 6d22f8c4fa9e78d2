// src/presentation/http/routes.rs
use crate::presentation::http::middleware::rate_limit::CredentialLimiter;
use crate::presentation::http::state::{ProviderState, RelyingPartyState};
use crate::presentation::http::{
    controllers::{authorize, discovery, relying_party, token},
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Identity provider routes. `limiter` guards the endpoints that take secrets
/// and belongs to this router alone.
pub fn build_provider_router(state: ProviderState, limiter: Option<CredentialLimiter>) -> Router {
    let mut credentials = Router::new()
        .route(
            "/authenticate",
            get(authorize::authentication_form).post(authorize::authenticate),
        )
        .route("/token", post(token::token));
    if let Some(limiter) = limiter {
        credentials = credentials.route_layer(limiter);
    }

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi))
        .route(
            "/.well-known/openid-configuration",
            get(discovery::openid_configuration),
        )
        .route("/jwks", get(discovery::jwks))
        .route("/authorize", get(authorize::authorize))
        .route("/authorize/yes", get(authorize::approve))
        .route("/authorize/no", get(authorize::deny))
        .merge(credentials)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

pub fn build_relying_party_router(state: RelyingPartyState) -> Router {
    Router::new()
        .route("/", get(relying_party::index))
        .route("/authz", get(relying_party::start))
        .route("/callback", get(relying_party::callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
