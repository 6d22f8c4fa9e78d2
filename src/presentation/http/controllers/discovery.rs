// src/presentation/http/controllers/discovery.rs
use crate::domain::token::JsonWebKeySet;
use crate::presentation::http::state::ProviderState;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,

    pub response_types_supported: Vec<String>,
    pub response_modes_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub scopes_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub claims_supported: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[utoipa::path(
    get,
    path = "/.well-known/openid-configuration",
    responses(
        (status = 200, description = "OpenID Connect Discovery document", body = OpenIdConfiguration),
    ),
    tag = "OpenID Provider"
)]
pub async fn openid_configuration(
    Extension(state): Extension<ProviderState>,
) -> Json<OpenIdConfiguration> {
    let base = state.services.issuer();

    Json(OpenIdConfiguration {
        issuer: base.to_string(),
        authorization_endpoint: format!("{base}/authorize"),
        token_endpoint: format!("{base}/token"),
        jwks_uri: format!("{base}/jwks"),

        response_types_supported: strings(&["code"]),
        response_modes_supported: strings(&["query"]),
        grant_types_supported: strings(&["authorization_code"]),
        subject_types_supported: strings(&["public"]),
        id_token_signing_alg_values_supported: strings(&["EdDSA"]),
        token_endpoint_auth_methods_supported: strings(&["client_secret_basic", "client_secret_post"]),
        scopes_supported: strings(&["openid"]),
        code_challenge_methods_supported: strings(&["S256", "plain"]),
        claims_supported: strings(&["iss", "sub", "aud", "iat", "exp", "nonce"]),
    })
}

#[utoipa::path(
    get,
    path = "/jwks",
    responses(
        (status = 200, description = "Public keys for ID token verification", body = JsonWebKeySet),
    ),
    tag = "OpenID Provider"
)]
pub async fn jwks(Extension(state): Extension<ProviderState>) -> Json<JsonWebKeySet> {
    Json(state.services.key_set())
}
