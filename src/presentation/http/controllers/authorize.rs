// src/presentation/http/controllers/authorize.rs
use crate::application::error::ApplicationError;
use crate::domain::authorization::{AuthorizationParams, AuthorizationRequest};
use crate::presentation::http::controllers::found;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::state::ProviderState;
use crate::presentation::http::views;
use axum::{
    Extension, Form,
    extract::{Query, RawQuery},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub passwd: String,
}

#[derive(Debug, Deserialize)]
pub struct ConsentParams {
    pub ticket: Option<String>,
    pub redirect_uri: Option<String>,
}

fn validated(state: &ProviderState, raw: &str) -> HttpResult<AuthorizationRequest> {
    let params: AuthorizationParams = serde_urlencoded::from_str(raw)
        .map_err(|err| ApplicationError::malformed(err.to_string()))
        .into_http()?;
    state.services.authorization.validate(params).into_http()
}

/// `GET /authorize`: validate, then hand over to the authentication step
/// with the query untouched.
pub async fn authorize(
    Extension(state): Extension<ProviderState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Response> {
    let raw = query.unwrap_or_default();
    let request = validated(&state, &raw)?;
    tracing::debug!(client_id = %request.client_id, "authorization request accepted");

    Ok(found(&format!("/authenticate?{raw}")))
}

/// `GET /authenticate`
pub async fn authentication_form(
    Extension(state): Extension<ProviderState>,
    RawQuery(query): RawQuery,
) -> HttpResult<Html<String>> {
    let raw = query.unwrap_or_default();
    validated(&state, &raw)?;
    Ok(views::authentication_page(&raw, None))
}

/// `POST /authenticate`: on bad credentials the form comes back, nothing is issued.
pub async fn authenticate(
    Extension(state): Extension<ProviderState>,
    RawQuery(query): RawQuery,
    Form(credentials): Form<Credentials>,
) -> HttpResult<Response> {
    let raw = query.unwrap_or_default();
    let request = validated(&state, &raw)?;

    match state
        .services
        .authorization
        .authenticate(request.clone(), &credentials.id, &credentials.passwd)
        .await
    {
        Ok(ticket) => Ok(views::consent_page(&request, &ticket).into_response()),
        Err(ApplicationError::AuthenticationFailure) => Ok((
            StatusCode::UNAUTHORIZED,
            views::authentication_page(&raw, Some("Invalid ID or password.")),
        )
            .into_response()),
        Err(err) => Err(HttpError::from_error(err)),
    }
}

fn ticket(params: &ConsentParams) -> HttpResult<&str> {
    params
        .ticket
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| HttpError::from_error(ApplicationError::malformed("missing consent ticket")))
}

/// `GET /authorize/yes`
///
/// The ticket is required. It is the only proof that this browser signed in,
/// and it carries the request that was validated before sign-in. Query
/// parameters alone could name any subject or redirect target.
pub async fn approve(
    Extension(state): Extension<ProviderState>,
    Query(params): Query<ConsentParams>,
) -> HttpResult<Response> {
    let url = state
        .services
        .authorization
        .approve(ticket(&params)?, params.redirect_uri.as_deref())
        .await
        .into_http()?;
    Ok(found(url.as_str()))
}

/// `GET /authorize/no`
pub async fn deny(
    Extension(state): Extension<ProviderState>,
    Query(params): Query<ConsentParams>,
) -> HttpResult<Response> {
    let url = state
        .services
        .authorization
        .deny(ticket(&params)?, params.redirect_uri.as_deref())
        .await
        .into_http()?;
    Ok(found(url.as_str()))
}
