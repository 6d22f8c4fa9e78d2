// src/application/dto.rs
use crate::domain::token::IdTokenClaims;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const BEARER: &str = "Bearer";

/// Successful token response (OpenID Connect Core §3.1.3.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub id_token: String,
    pub expires_in: i64,
}

/// Token endpoint request after form decoding; credentials may also arrive
/// through HTTP Basic and are merged in by the controller.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TokenGrant {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub code_verifier: Option<String>,
}

/// Parameters the provider appends to the relying party's callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Outcome of a completed login at the relying party.
#[derive(Debug, Clone)]
pub struct VerifiedLogin {
    pub claims: IdTokenClaims,
    pub token: TokenResponse,
}
