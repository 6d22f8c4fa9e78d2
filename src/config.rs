// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

const DEFAULT_PROVIDER_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_PROVIDER_ISSUER: &str = "http://localhost:8080";
const DEFAULT_RELYING_PARTY_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_CLIENT_ID: &str = "app";
const DEFAULT_CLIENT_SECRET: &str = "secret";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/callback";

/// Key lookup the loaders read from; `from_env` passes the process environment.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn var_or(lookup: Lookup<'_>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn seconds_or(
    lookup: Lookup<'_>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid(format!("{key} must be a number of seconds"))),
        None => Ok(Duration::from_secs(default)),
    }
}

fn positive_seconds_or(
    lookup: Lookup<'_>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let value = seconds_or(lookup, key, default)?;
    if value.is_zero() {
        return Err(ConfigError::Invalid(format!("{key} must be at least 1")));
    }
    Ok(value)
}

fn flag_or(lookup: Lookup<'_>, key: &str, default: bool) -> bool {
    lookup(key).map_or(default, |v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Credential endpoint throttling: one request is replenished every `period`,
/// up to `burst` stored. Clients are told apart by peer address unless
/// `trust_forwarded` is set, in which case `X-Forwarded-For`, `X-Real-IP` and
/// `Forwarded` are honoured. Only enable that behind a proxy that overwrites them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub period: Duration,
    pub burst: u32,
    pub trust_forwarded: bool,
}

impl RateLimitSettings {
    fn from_vars(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let burst = match lookup("IDP_RATE_LIMIT_BURST") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                ConfigError::Invalid("IDP_RATE_LIMIT_BURST must be a whole number".into())
            })?,
            None => 10,
        };
        if burst == 0 {
            return Err(ConfigError::Invalid(
                "IDP_RATE_LIMIT_BURST must be at least 1".into(),
            ));
        }

        Ok(Self {
            period: positive_seconds_or(lookup, "IDP_RATE_LIMIT_PERIOD_SECONDS", 2)?,
            burst,
            trust_forwarded: flag_or(lookup, "IDP_TRUST_FORWARDED_HEADERS", false),
        })
    }
}

/// Identity provider settings.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    listen_addr: String,
    issuer: String,
    signing_key: Option<String>,
    code_ttl: Duration,
    consent_ttl: Duration,
    token_ttl: Duration,
    client_id: String,
    client_secret: String,
    redirect_uris: Vec<String>,
    demo_user: String,
    demo_password: String,
    rate_limit: Option<RateLimitSettings>,
}

impl ProviderConfig {
    /// Build configuration from environment variables. Uses defaults that
    /// line up with [`RelyingPartyConfig`] so both binaries work out of the box.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&|key: &str| env::var(key).ok())
    }

    pub fn from_vars(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let code_ttl = seconds_or(lookup, "IDP_CODE_TTL_SECONDS", 120)?;
        if code_ttl.is_zero() || code_ttl > Duration::from_secs(600) {
            return Err(ConfigError::Invalid(
                "IDP_CODE_TTL_SECONDS must be between 1 and 600".into(),
            ));
        }

        let redirect_uris: Vec<String> =
            var_or(lookup, "IDP_CLIENT_REDIRECT_URIS", DEFAULT_REDIRECT_URI)
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        if redirect_uris.is_empty() {
            return Err(ConfigError::Missing("IDP_CLIENT_REDIRECT_URIS"));
        }

        let rate_limit = if flag_or(lookup, "IDP_RATE_LIMIT", true) {
            Some(RateLimitSettings::from_vars(lookup)?)
        } else {
            None
        };

        Ok(Self {
            listen_addr: var_or(lookup, "IDP_LISTEN_ADDR", DEFAULT_PROVIDER_ADDR),
            issuer: var_or(lookup, "IDP_ISSUER", DEFAULT_PROVIDER_ISSUER),
            signing_key: lookup("IDP_SIGNING_KEY").filter(|v| !v.is_empty()),
            code_ttl,
            consent_ttl: positive_seconds_or(lookup, "IDP_CONSENT_TTL_SECONDS", 300)?,
            token_ttl: positive_seconds_or(lookup, "IDP_TOKEN_TTL_SECONDS", 3600)?,
            client_id: var_or(lookup, "IDP_CLIENT_ID", DEFAULT_CLIENT_ID),
            client_secret: var_or(lookup, "IDP_CLIENT_SECRET", DEFAULT_CLIENT_SECRET),
            redirect_uris,
            demo_user: var_or(lookup, "IDP_DEMO_USER", "userid"),
            demo_password: var_or(lookup, "IDP_DEMO_PASSWORD", "passwd"),
            rate_limit,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Base64url Ed25519 seed; `None` means a fresh key per process.
    pub fn signing_key(&self) -> Option<&str> {
        self.signing_key.as_deref()
    }

    pub fn code_ttl(&self) -> Duration {
        self.code_ttl
    }

    pub fn consent_ttl(&self) -> Duration {
        self.consent_ttl
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uris(&self) -> &[String] {
        &self.redirect_uris
    }

    pub fn demo_user(&self) -> (&str, &str) {
        (&self.demo_user, &self.demo_password)
    }

    /// `None` when `IDP_RATE_LIMIT` is off.
    pub fn rate_limit(&self) -> Option<&RateLimitSettings> {
        self.rate_limit.as_ref()
    }
}

/// Relying party settings.
#[derive(Clone, Debug)]
pub struct RelyingPartyConfig {
    listen_addr: String,
    issuer: String,
    authorize_url: String,
    token_url: String,
    jwks_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    http_timeout: Duration,
}

impl RelyingPartyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&|key: &str| env::var(key).ok())
    }

    pub fn from_vars(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let issuer = var_or(lookup, "RP_ISSUER", DEFAULT_PROVIDER_ISSUER)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            listen_addr: var_or(lookup, "RP_LISTEN_ADDR", DEFAULT_RELYING_PARTY_ADDR),
            authorize_url: var_or(lookup, "RP_AUTHORIZE_URL", &format!("{issuer}/authorize")),
            token_url: var_or(lookup, "RP_TOKEN_URL", &format!("{issuer}/token")),
            jwks_url: var_or(lookup, "RP_JWKS_URL", &format!("{issuer}/jwks")),
            issuer,
            client_id: var_or(lookup, "RP_CLIENT_ID", DEFAULT_CLIENT_ID),
            client_secret: var_or(lookup, "RP_CLIENT_SECRET", DEFAULT_CLIENT_SECRET),
            redirect_uri: var_or(lookup, "RP_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            http_timeout: positive_seconds_or(lookup, "RP_HTTP_TIMEOUT_SECONDS", 10)?,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}
