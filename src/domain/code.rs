// src/domain/code.rs
use crate::domain::authorization::{AttemptState, AuthorizationRequest, PkceChallenge};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// An issued authorization code together with everything it is bound to.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    pub value: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub subject: String,
    pub nonce: Option<String>,
    pub pkce: Option<PkceChallenge>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

/// What a token request presents when it tries to redeem a code.
#[derive(Debug, Clone, Copy)]
pub struct RedemptionAttempt<'a> {
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub code_verifier: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GrantRejection {
    #[error("unknown authorization code")]
    Unknown,
    #[error("authorization code expired")]
    Expired,
    #[error("authorization code already used")]
    AlreadyUsed,
    #[error("authorization code was issued to another client")]
    ClientMismatch,
    #[error("redirect_uri does not match the authorization request")]
    RedirectMismatch,
    #[error("code_verifier missing")]
    MissingVerifier,
    #[error("code_verifier does not match the challenge")]
    VerifierMismatch,
}

impl AuthorizationCode {
    pub fn issue(
        value: String,
        request: &AuthorizationRequest,
        subject: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            value,
            client_id: request.client_id.clone(),
            redirect_uri: request.redirect_uri.clone(),
            subject: subject.into(),
            nonce: request.nonce.clone(),
            pkce: request.pkce.clone(),
            issued_at,
            expires_at: issued_at + ttl,
            used: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn state(&self, now: DateTime<Utc>) -> AttemptState {
        if self.used {
            AttemptState::Redeemed
        } else if self.is_expired(now) {
            AttemptState::Expired
        } else {
            AttemptState::CodeIssued
        }
    }

    /// Decide whether `attempt` may redeem this code at `now`. Does not mutate;
    /// the store flips `used` in the same critical section on success.
    pub fn admit(&self, attempt: &RedemptionAttempt<'_>, now: DateTime<Utc>) -> Result<(), GrantRejection> {
        match self.state(now) {
            AttemptState::Redeemed => return Err(GrantRejection::AlreadyUsed),
            AttemptState::Expired => return Err(GrantRejection::Expired),
            _ => {}
        }

        if self.client_id != attempt.client_id {
            return Err(GrantRejection::ClientMismatch);
        }
        if self.redirect_uri != attempt.redirect_uri {
            return Err(GrantRejection::RedirectMismatch);
        }

        match (&self.pkce, attempt.code_verifier) {
            (Some(_), None) => Err(GrantRejection::MissingVerifier),
            (Some(challenge), Some(verifier)) if !challenge.verify(verifier) => {
                Err(GrantRejection::VerifierMismatch)
            }
            // a verifier for a code issued without a challenge signals a downgrade
            (None, Some(_)) => Err(GrantRejection::VerifierMismatch),
            _ => Ok(()),
        }
    }
}
