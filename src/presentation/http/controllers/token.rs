// src/presentation/http/controllers/token.rs
use crate::application::{
    dto::{TokenGrant, TokenResponse},
    error::ApplicationError,
};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::state::ProviderState;
use axum::{
    Extension, Form, Json,
    extract::rejection::FormRejection,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use headers::{Authorization, HeaderMapExt, authorization::Basic};

#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenGrant, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued for a valid authorization code", body = TokenResponse),
        (status = 400, description = "invalid_request, invalid_grant or unauthorized_client", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "OpenID Provider"
)]
pub async fn token(
    Extension(state): Extension<ProviderState>,
    headers: HeaderMap,
    form: Result<Form<TokenGrant>, FormRejection>,
) -> HttpResult<impl IntoResponse> {
    let Form(mut grant) = form.map_err(|rejection| {
        HttpError::from_error(ApplicationError::malformed(rejection.body_text()))
    })?;

    // client_secret_basic takes precedence over client_secret_post
    if let Some(Authorization(basic)) = headers.typed_get::<Authorization<Basic>>() {
        grant.client_id = Some(basic.username().to_string());
        grant.client_secret = Some(basic.password().to_string());
    }

    let response = state.services.tokens.exchange(grant).await.into_http()?;

    Ok((
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(response),
    ))
}
