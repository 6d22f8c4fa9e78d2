// src/domain/client.rs
use std::fmt;

/// A client known to the provider, with its exact-match redirect URIs.
#[derive(Clone)]
pub struct RegisteredClient {
    pub client_id: String,
    client_secret: String,
    pub redirect_uris: Vec<String>,
}

impl RegisteredClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uris: Vec<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uris,
        }
    }

    pub fn allows_redirect(&self, redirect_uri: &str) -> bool {
        self.redirect_uris.iter().any(|uri| uri == redirect_uri)
    }

    /// Constant-time comparison (blake3 `Hash` equality is constant time).
    pub fn secret_matches(&self, presented: &str) -> bool {
        blake3::hash(self.client_secret.as_bytes()) == blake3::hash(presented.as_bytes())
    }
}

impl fmt::Debug for RegisteredClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uris", &self.redirect_uris)
            .finish()
    }
}
