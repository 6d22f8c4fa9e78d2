// src/presentation/http/openapi.rs
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

/// Machine-readable description of the provider's JSON endpoints. The
/// browser steps (`/authorize`, `/authenticate`, consent) render HTML and are
/// left out.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::token::token,
        crate::presentation::http::controllers::discovery::openid_configuration,
        crate::presentation::http::controllers::discovery::jwks,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::discovery::OpenIdConfiguration,
            crate::application::dto::TokenGrant,
            crate::application::dto::TokenResponse,
            crate::domain::token::JsonWebKeySet,
            crate::domain::token::JsonWebKey
        )
    ),
    tags(
        (name = "OpenID Provider", description = "Token, discovery and key endpoints"),
        (name = "System", description = "System level endpoints")
    ),
    info(
        title = "OIDC Code Flow Provider",
        description = "OpenID Connect Authorization Code flow identity provider",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
