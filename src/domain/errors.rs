// src/domain/errors.rs
use crate::domain::authorization::AttemptState;
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("unsupported response_type: {0}")]
    UnsupportedResponseType(String),
    #[error("scope must include openid")]
    MissingOpenIdScope,
    #[error("invalid redirect_uri: {0}")]
    InvalidRedirectUri(String),
    #[error("unsupported code_challenge_method: {0}")]
    UnsupportedChallengeMethod(String),
    #[error("invalid authorization state transition: {from:?} -> {to:?}")]
    InvalidTransition { from: AttemptState, to: AttemptState },
}
