// src/domain/authorization.rs
use crate::domain::errors::{DomainError, DomainResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

pub const OPENID_SCOPE: &str = "openid";

/// Query parameters of an authorization request as received, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Code,
}

impl ResponseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMethod {
    Plain,
    S256,
}

impl ChallengeMethod {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw {
            "plain" => Ok(Self::Plain),
            "S256" => Ok(Self::S256),
            other => Err(DomainError::UnsupportedChallengeMethod(other.to_string())),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::S256 => "S256",
        }
    }
}

/// PKCE challenge recorded with the authorization request (RFC 7636).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    pub challenge: String,
    pub method: ChallengeMethod,
}

impl PkceChallenge {
    pub fn s256_from_verifier(verifier: &str) -> Self {
        Self {
            challenge: s256(verifier),
            method: ChallengeMethod::S256,
        }
    }

    pub fn verify(&self, verifier: &str) -> bool {
        match self.method {
            ChallengeMethod::Plain => self.challenge == verifier,
            ChallengeMethod::S256 => self.challenge == s256(verifier),
        }
    }
}

fn s256(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// A validated authorization request. Whether the client may use
/// `redirect_uri` is checked against the registry by the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub response_type: ResponseType,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: Vec<String>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub pkce: Option<PkceChallenge>,
}

impl TryFrom<AuthorizationParams> for AuthorizationRequest {
    type Error = DomainError;

    fn try_from(params: AuthorizationParams) -> DomainResult<Self> {
        let response_type = required(params.response_type, "response_type")?;
        if response_type != ResponseType::Code.as_str() {
            return Err(DomainError::UnsupportedResponseType(response_type));
        }

        let client_id = required(params.client_id, "client_id")?;
        let redirect_uri = required(params.redirect_uri, "redirect_uri")?;
        validate_redirect_uri(&redirect_uri)?;

        let scope = parse_scope(&required(params.scope, "scope")?);
        if !scope.iter().any(|s| s == OPENID_SCOPE) {
            return Err(DomainError::MissingOpenIdScope);
        }

        let pkce = match (non_empty(params.code_challenge), non_empty(params.code_challenge_method)) {
            (Some(challenge), method) => Some(PkceChallenge {
                challenge,
                method: method
                    .as_deref()
                    .map_or(Ok(ChallengeMethod::Plain), ChallengeMethod::parse)?,
            }),
            (None, Some(_)) => return Err(DomainError::MissingParameter("code_challenge")),
            (None, None) => None,
        };

        Ok(Self {
            response_type: ResponseType::Code,
            client_id,
            redirect_uri,
            scope,
            state: non_empty(params.state),
            nonce: non_empty(params.nonce),
            pkce,
        })
    }
}

/// Scope values are space-delimited per RFC 6749; commas are accepted as well.
pub fn parse_scope(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_redirect_uri(raw: &str) -> DomainResult<()> {
    let url = Url::parse(raw).map_err(|err| DomainError::InvalidRedirectUri(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::InvalidRedirectUri(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.fragment().is_some() {
        return Err(DomainError::InvalidRedirectUri(
            "fragment is not allowed".into(),
        ));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> DomainResult<String> {
    non_empty(value).ok_or(DomainError::MissingParameter(name))
}

/// Lifecycle of one authorization attempt at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Requested,
    Authenticating,
    Granted,
    Denied,
    CodeIssued,
    Redeemed,
    Expired,
}

impl AttemptState {
    pub fn transition(self, next: Self) -> DomainResult<Self> {
        use AttemptState::{Authenticating, CodeIssued, Denied, Expired, Granted, Redeemed, Requested};

        let allowed = matches!(
            (self, next),
            (Requested, Authenticating)
                | (Authenticating, Granted | Denied)
                | (Granted, CodeIssued)
                | (CodeIssued, Redeemed | Expired)
        );

        if allowed {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Denied | Self::Redeemed | Self::Expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AuthorizationParams {
        AuthorizationParams {
            response_type: Some("code".into()),
            client_id: Some("app".into()),
            redirect_uri: Some("http://rp/callback".into()),
            scope: Some("openid".into()),
            ..AuthorizationParams::default()
        }
    }

    #[test]
    fn accepts_minimal_openid_request() {
        let request = AuthorizationRequest::try_from(params()).unwrap();
        assert_eq!(request.client_id, "app");
        assert_eq!(request.scope, vec!["openid".to_string()]);
        assert!(request.state.is_none());
        assert!(request.pkce.is_none());
    }

    #[test]
    fn each_required_parameter_is_enforced() {
        let cases: [(&str, fn(&mut AuthorizationParams)); 4] = [
            ("response_type", |p| p.response_type = None),
            ("client_id", |p| p.client_id = Some(String::new())),
            ("redirect_uri", |p| p.redirect_uri = None),
            ("scope", |p| p.scope = None),
        ];
        for (name, strip) in cases {
            let mut p = params();
            strip(&mut p);
            assert_eq!(
                AuthorizationRequest::try_from(p).unwrap_err(),
                DomainError::MissingParameter(name)
            );
        }
    }

    #[test]
    fn scope_without_openid_is_rejected() {
        let mut p = params();
        p.scope = Some("profile email".into());
        assert_eq!(
            AuthorizationRequest::try_from(p).unwrap_err(),
            DomainError::MissingOpenIdScope
        );
    }

    #[test]
    fn scope_accepts_spaces_and_commas() {
        assert_eq!(parse_scope("profile,openid"), vec!["profile", "openid"]);
        assert_eq!(parse_scope(" openid  email "), vec!["openid", "email"]);
    }

    #[test]
    fn only_code_response_type_is_supported() {
        let mut p = params();
        p.response_type = Some("token".into());
        assert!(matches!(
            AuthorizationRequest::try_from(p),
            Err(DomainError::UnsupportedResponseType(_))
        ));
    }

    #[test]
    fn redirect_uri_must_be_absolute_http() {
        for bad in ["/callback", "javascript:alert(1)", "http://rp/cb#frag"] {
            let mut p = params();
            p.redirect_uri = Some(bad.into());
            assert!(
                matches!(
                    AuthorizationRequest::try_from(p),
                    Err(DomainError::InvalidRedirectUri(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn pkce_defaults_to_plain_and_verifies_s256() {
        let mut p = params();
        p.code_challenge = Some("verifier".into());
        let request = AuthorizationRequest::try_from(p).unwrap();
        let pkce = request.pkce.unwrap();
        assert_eq!(pkce.method, ChallengeMethod::Plain);
        assert!(pkce.verify("verifier"));

        let s256 = PkceChallenge::s256_from_verifier("some-long-random-verifier");
        assert!(s256.verify("some-long-random-verifier"));
        assert!(!s256.verify("other"));
    }

    #[test]
    fn attempt_state_follows_the_flow() {
        let state = AttemptState::Requested
            .transition(AttemptState::Authenticating)
            .and_then(|s| s.transition(AttemptState::Granted))
            .and_then(|s| s.transition(AttemptState::CodeIssued))
            .and_then(|s| s.transition(AttemptState::Redeemed))
            .unwrap();
        assert!(state.is_terminal());
        assert!(AttemptState::Redeemed.transition(AttemptState::Redeemed).is_err());
        assert!(AttemptState::Denied.transition(AttemptState::CodeIssued).is_err());
    }
}
