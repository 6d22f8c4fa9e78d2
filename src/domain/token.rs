// src/domain/token.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by the ID token (OpenID Connect Core §2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl IdTokenClaims {
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        audience: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        nonce: Option<String>,
    ) -> Self {
        Self {
            iss: issuer.into(),
            sub: subject.into(),
            aud: audience.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            nonce,
        }
    }

    pub const fn expires_after_issue(&self) -> bool {
        self.exp > self.iat
    }
}

/// Public half of a signing key in JWK form (RFC 8037 OKP for Ed25519).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JsonWebKey {
    pub kty: String,
    pub crv: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub kid: String,
    pub x: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}
