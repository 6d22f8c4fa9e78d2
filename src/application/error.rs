// src/application/error.rs
use crate::domain::{code::GrantRejection, errors::DomainError};
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("access denied by resource owner")]
    AccessDenied,

    #[error("invalid grant: {0}")]
    InvalidGrant(#[from] GrantRejection),

    #[error("unauthorized client: {0}")]
    UnauthorizedClient(String),

    #[error("identity provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("identity provider rejected the request: {0}")]
    UpstreamRejected(String),

    #[error("invalid id_token: {0}")]
    InvalidIdToken(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    pub fn unauthorized_client(msg: impl Into<String>) -> Self {
        Self::UnauthorizedClient(msg.into())
    }

    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn invalid_id_token(msg: impl Into<String>) -> Self {
        Self::InvalidIdToken(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }
}
