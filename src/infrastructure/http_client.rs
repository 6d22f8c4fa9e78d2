// src/infrastructure/http_client.rs
use crate::application::{
    ApplicationResult,
    dto::TokenResponse,
    error::ApplicationError,
    ports::upstream::{CodeExchange, ProviderClient},
    services::token::AUTHORIZATION_CODE_GRANT,
};
use crate::domain::token::JsonWebKeySet;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
}

/// Talks to the provider's token and JWKS endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestProviderClient {
    http: reqwest::Client,
    token_url: String,
    jwks_url: String,
}

impl ReqwestProviderClient {
    pub fn new(
        token_url: impl Into<String>,
        jwks_url: impl Into<String>,
        timeout: Duration,
    ) -> ApplicationResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            http,
            token_url: token_url.into(),
            jwks_url: jwks_url.into(),
        })
    }
}

fn unavailable(err: &reqwest::Error) -> ApplicationError {
    ApplicationError::upstream_unavailable(err.to_string())
}

#[async_trait]
impl ProviderClient for ReqwestProviderClient {
    async fn exchange_code(&self, exchange: &CodeExchange) -> ApplicationResult<TokenResponse> {
        let mut form = vec![
            ("grant_type", AUTHORIZATION_CODE_GRANT),
            ("code", exchange.code.as_str()),
            ("redirect_uri", exchange.redirect_uri.as_str()),
        ];
        if let Some(verifier) = exchange.code_verifier.as_deref() {
            form.push(("code_verifier", verifier));
        }

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&exchange.client_id, Some(&exchange.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|err| unavailable(&err))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ApplicationError::upstream_unavailable(format!(
                "token endpoint returned {status}"
            )));
        }
        let body = response.bytes().await.map_err(|err| unavailable(&err))?;

        if status.is_success() {
            return serde_json::from_slice::<TokenResponse>(&body).map_err(|err| {
                ApplicationError::upstream_unavailable(format!("unreadable token response: {err}"))
            });
        }

        match serde_json::from_slice::<OAuthErrorBody>(&body) {
            Ok(rejection) => {
                tracing::warn!(error = %rejection.error, %status, "token endpoint rejected the code");
                Err(ApplicationError::UpstreamRejected(rejection.error))
            }
            Err(_) => Err(ApplicationError::upstream_unavailable(format!(
                "token endpoint returned {status}"
            ))),
        }
    }

    async fn fetch_key_set(&self) -> ApplicationResult<JsonWebKeySet> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| unavailable(&err))?;

        response.json::<JsonWebKeySet>().await.map_err(|err| unavailable(&err))
    }
}
