// src/infrastructure/security/token.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::{IdTokenVerifier, TokenSigner},
};
use crate::domain::token::{IdTokenClaims, JsonWebKey, JsonWebKeySet};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{SigningKey, pkcs8::EncodePrivateKey};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode};
use rand::rngs::OsRng;

/// Signs ID tokens as compact JWS with EdDSA over Ed25519.
#[derive(Clone)]
pub struct Ed25519TokenSigner {
    encoding_key: EncodingKey,
    jwk: JsonWebKey,
}

impl Ed25519TokenSigner {
    pub fn from_seed(seed: &[u8; 32]) -> ApplicationResult<Self> {
        let signing_key = SigningKey::from_bytes(seed);
        let der = signing_key
            .to_pkcs8_der()
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let encoding_key = EncodingKey::from_ed_der(der.as_bytes());

        let public = signing_key.verifying_key().to_bytes();
        let kid = blake3::hash(&public).to_hex()[..16].to_string();

        Ok(Self {
            encoding_key,
            jwk: JsonWebKey {
                kty: "OKP".into(),
                crv: "Ed25519".into(),
                alg: "EdDSA".into(),
                key_use: "sig".into(),
                kid,
                x: URL_SAFE_NO_PAD.encode(public),
            },
        })
    }

    /// Seed given as base64url (32 bytes), e.g. from configuration.
    pub fn from_base64_seed(encoded: &str) -> ApplicationResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|err| ApplicationError::infrastructure(format!("signing key: {err}")))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ApplicationError::infrastructure("signing key must be 32 bytes"))?;
        Self::from_seed(&seed)
    }

    pub fn generate() -> ApplicationResult<Self> {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_seed(&signing_key.to_bytes())
    }

    pub fn kid(&self) -> &str {
        &self.jwk.kid
    }
}

impl TokenSigner for Ed25519TokenSigner {
    fn sign_token(&self, claims: &IdTokenClaims) -> ApplicationResult<String> {
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(self.jwk.kid.clone());
        encode(&header, claims, &self.encoding_key)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    fn key_set(&self) -> JsonWebKeySet {
        JsonWebKeySet {
            keys: vec![self.jwk.clone()],
        }
    }
}

/// Relying-party side check of an ID token against the provider's key set.
#[derive(Debug, Clone)]
pub struct JwksIdTokenVerifier {
    issuer: String,
    audience: String,
    leeway_secs: u64,
}

impl JwksIdTokenVerifier {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into().trim_end_matches('/').to_string(),
            audience: audience.into(),
            leeway_secs: 30,
        }
    }
}

impl IdTokenVerifier for JwksIdTokenVerifier {
    fn verify(
        &self,
        id_token: &str,
        keys: &JsonWebKeySet,
        expected_nonce: Option<&str>,
    ) -> ApplicationResult<IdTokenClaims> {
        let invalid = |err: jsonwebtoken::errors::Error| ApplicationError::invalid_id_token(err.to_string());

        let header = decode_header(id_token).map_err(invalid)?;
        if header.alg != Algorithm::EdDSA {
            return Err(ApplicationError::invalid_id_token(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| ApplicationError::invalid_id_token("missing kid"))?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| ApplicationError::invalid_id_token(format!("unknown signing key {kid}")))?;
        let key = DecodingKey::from_ed_components(&jwk.x).map_err(invalid)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = self.leeway_secs;

        let claims = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(invalid)?
            .claims;

        if !claims.expires_after_issue() {
            return Err(ApplicationError::invalid_id_token("exp is not after iat"));
        }
        if let Some(nonce) = expected_nonce {
            if claims.nonce.as_deref() != Some(nonce) {
                return Err(ApplicationError::invalid_id_token("nonce mismatch"));
            }
        }

        Ok(claims)
    }
}
