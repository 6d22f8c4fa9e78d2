// src/presentation/http/middleware/rate_limit.rs
use crate::config::{ConfigError, RateLimitSettings};
use ::governor::middleware::NoOpMiddleware;
use axum::{
    body::Body,
    http::{Method, Request},
};
use std::net::IpAddr;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Where the limiter reads the client address from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientIp {
    /// The socket peer. Requires a server started with connect info.
    Peer,
    /// `X-Forwarded-For`, `X-Real-IP` or `Forwarded`, then the peer.
    Forwarded,
}

impl KeyExtractor for ClientIp {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        match self {
            Self::Peer => PeerIpKeyExtractor.extract(req),
            Self::Forwarded => SmartIpKeyExtractor.extract(req),
        }
    }
}

pub type CredentialLimiter = GovernorLayer<ClientIp, NoOpMiddleware, Body>;

/// Limiter for the endpoints that accept secrets. Only `POST` requests are
/// counted, so `GET /authenticate` (the sign-in form) stays unthrottled.
/// Every call builds a fresh key table.
pub fn credential_limiter(settings: &RateLimitSettings) -> Result<CredentialLimiter, ConfigError> {
    let client_ip = if settings.trust_forwarded {
        ClientIp::Forwarded
    } else {
        ClientIp::Peer
    };

    let config = GovernorConfigBuilder::default()
        .period(settings.period)
        .burst_size(settings.burst)
        .methods(vec![Method::POST])
        .key_extractor(client_ip)
        .finish()
        .ok_or_else(|| {
            ConfigError::Invalid("rate limit period and burst must both be positive".into())
        })?;

    Ok(GovernorLayer::new(config))
}
