// src/presentation/http/controllers/relying_party.rs
use crate::application::dto::CallbackParams;
use crate::presentation::http::controllers::found;
use crate::presentation::http::error::HttpError;
use crate::presentation::http::state::RelyingPartyState;
use crate::presentation::http::views;
use axum::{
    Extension,
    extract::Query,
    response::{Html, IntoResponse, Response},
};

/// Errors on the relying party are shown to a person, so they render as HTML.
fn error_page(err: HttpError) -> Response {
    tracing::warn!(code = err.code(), message = err.message(), "login failed");
    (err.status(), views::relying_party_error(err.code(), err.message())).into_response()
}

/// `GET /`
pub async fn index() -> Html<String> {
    views::relying_party_index()
}

/// `GET /authz`: send the user agent to the provider.
pub async fn start(Extension(state): Extension<RelyingPartyState>) -> Response {
    match state.relying_party.begin().await {
        Ok(url) => found(url.as_str()),
        Err(err) => error_page(HttpError::from_error(err)),
    }
}

/// `GET /callback`
pub async fn callback(
    Extension(state): Extension<RelyingPartyState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    match state.relying_party.complete(params).await {
        Ok(login) => views::relying_party_login(&login).into_response(),
        Err(err) => error_page(HttpError::from_error(err)),
    }
}
