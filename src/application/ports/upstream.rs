// src/application/ports/upstream.rs
use crate::application::{ApplicationResult, dto::TokenResponse};
use crate::domain::token::JsonWebKeySet;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct CodeExchange {
    pub code: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub code_verifier: Option<String>,
}

/// Back channel from the relying party to the identity provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn exchange_code(&self, exchange: &CodeExchange) -> ApplicationResult<TokenResponse>;
    async fn fetch_key_set(&self) -> ApplicationResult<JsonWebKeySet>;
}
