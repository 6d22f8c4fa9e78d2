use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::CredentialVerifier,
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;
use std::collections::HashMap;

/// User store holding Argon2 PHC strings keyed by login id.
#[derive(Default, Clone)]
pub struct Argon2CredentialStore {
    users: HashMap<String, String>,
}

impl Argon2CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `password` and register it for `id`.
    pub fn with_user(mut self, id: impl Into<String>, password: &str) -> ApplicationResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        self.users.insert(id.into(), hash.to_string());
        Ok(self)
    }
}

#[async_trait]
impl CredentialVerifier for Argon2CredentialStore {
    async fn verify(&self, id: &str, password: &str) -> ApplicationResult<bool> {
        let Some(expected_hash) = self.users.get(id).cloned() else {
            return Ok(false);
        };
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || -> ApplicationResult<bool> {
            let parsed = PasswordHash::new(&expected_hash)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
    }
}
