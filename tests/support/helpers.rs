// tests/support/helpers.rs
use super::mocks::{PASSWORD, PlainCredentials, SequenceCodeGenerator, USER_ID};
use axum::Router;
use axum::body::{self, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use oidc_codeflow::application::ports::{
    AuthorizationCodeStorePort, ClientRegistryPort, ClockPort, CodeGeneratorPort, ConsentStorePort,
    CredentialVerifierPort, TokenSignerPort,
};
use oidc_codeflow::application::services::{
    ProviderDependencies, ProviderServices, ProviderSettings,
};
use oidc_codeflow::domain::client::RegisteredClient;
use oidc_codeflow::infrastructure::{
    clients::StaticClientRegistry,
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore,
        ticket_store::InMemoryTicketStore, token::Ed25519TokenSigner,
    },
    time::ManualClock,
};
use oidc_codeflow::presentation::http::{
    middleware::rate_limit::CredentialLimiter, routes::build_provider_router,
    state::ProviderState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt as _;
use url::Url;

pub const ISSUER: &str = "http://localhost:8080";
pub const CLIENT_ID: &str = "app";
pub const CLIENT_SECRET: &str = "secret";
pub const REDIRECT_URI: &str = "http://localhost:8000/callback";
pub const STATE: &str = "xyz";
pub const NONCE: &str = "n-0";

pub struct TestProvider {
    pub router: Router,
    pub services: Arc<ProviderServices>,
    pub clock: Arc<ManualClock>,
}

/// Lifetimes used by [`make_provider`].
pub fn provider_settings() -> ProviderSettings {
    ProviderSettings {
        issuer: ISSUER.to_string(),
        code_ttl: Duration::seconds(120),
        consent_ttl: Duration::seconds(300),
        token_ttl: Duration::seconds(3600),
    }
}

/// Provider wired with in-memory stores, a hand-driven clock and plain
/// credentials. No rate limiting.
pub fn make_provider() -> TestProvider {
    make_provider_with(provider_settings(), None)
}

pub fn make_provider_with(
    settings: ProviderSettings,
    limiter: Option<CredentialLimiter>,
) -> TestProvider {
    let clock = Arc::new(ManualClock::new(Utc::now()));

    let client = RegisteredClient::new(CLIENT_ID, CLIENT_SECRET, vec![REDIRECT_URI.to_string()]);
    let clients: Arc<ClientRegistryPort> = Arc::new(StaticClientRegistry::new([client]));
    let credentials: Arc<CredentialVerifierPort> = Arc::new(PlainCredentials);
    let codes: Arc<AuthorizationCodeStorePort> = Arc::new(InMemoryAuthorizationCodeStore::new());
    let consents: Arc<ConsentStorePort> = Arc::new(InMemoryTicketStore::new());
    let generator: Arc<CodeGeneratorPort> = Arc::new(SequenceCodeGenerator::default());
    let signer: Arc<TokenSignerPort> =
        Arc::new(Ed25519TokenSigner::from_seed(&[7u8; 32]).expect("signing key"));
    let clock_port: Arc<ClockPort> = clock.clone();

    let services = Arc::new(ProviderServices::new(
        ProviderDependencies {
            clients,
            credentials,
            codes,
            consents,
            generator,
            signer,
            clock: clock_port,
        },
        settings,
    ));

    let router = build_provider_router(
        ProviderState {
            services: Arc::clone(&services),
        },
        limiter,
    );

    TestProvider {
        router,
        services,
        clock,
    }
}

/// Query string of a well-formed authorization request plus `extra` pairs.
pub fn authorize_query(extra: &[(&str, &str)]) -> String {
    let mut pairs = vec![
        ("response_type", "code"),
        ("client_id", CLIENT_ID),
        ("redirect_uri", REDIRECT_URI),
        ("scope", "openid"),
        ("state", STATE),
        ("nonce", NONCE),
    ];
    pairs.extend_from_slice(extra);
    serde_urlencoded::to_string(&pairs).expect("encode query")
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub async fn post_form(app: &Router, uri: &str, pairs: &[(&str, &str)]) -> Response {
    post_form_with_headers(app, uri, pairs, HeaderMap::new()).await
}

pub async fn post_form_with_headers(
    app: &Router,
    uri: &str,
    pairs: &[(&str, &str)],
    headers: HeaderMap,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    for (name, value) in &headers {
        builder = builder.header(name, value);
    }
    let req = builder
        .body(Body::from(serde_urlencoded::to_string(pairs).unwrap()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub fn basic_auth(client_id: &str, secret: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let encoded = STANDARD.encode(format!("{client_id}:{secret}"));
    headers.insert(
        header::AUTHORIZATION,
        format!("Basic {encoded}").parse().unwrap(),
    );
    headers
}

/// `POST /token` with HTTP Basic client authentication.
pub async fn exchange(app: &Router, code: &str, extra: &[(&str, &str)]) -> Response {
    let mut pairs = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", REDIRECT_URI),
    ];
    pairs.extend_from_slice(extra);
    post_form_with_headers(app, "/token", &pairs, basic_auth(CLIENT_ID, CLIENT_SECRET)).await
}

pub async fn body_text(resp: Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn to_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let (parts, body_stream) = resp.into_parts();
    let bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (parts.status, parts.headers, json)
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

/// Assert an OAuth error body `{"error": code}` with the expected status.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert!(resp.headers().get(header::LOCATION).is_none(), "error must not redirect");
    let (status, headers, json) = to_json(resp).await;
    assert_eq!(status, expected_status);
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(json, serde_json::json!({ "error": expected_error }));
}

/// Pull the `/authorize/yes` and `/authorize/no` links out of a consent page.
pub fn consent_links(html: &str) -> (String, String) {
    let link = |prefix: &str| {
        let start = html.find(prefix).expect("consent link") + "href=\"".len();
        let end = start + html[start..].find('"').expect("closing quote");
        html[start..end].replace("&amp;", "&")
    };
    (
        link("href=\"/authorize/yes?"),
        link("href=\"/authorize/no?"),
    )
}

/// Authenticate as the demo user and return the consent page.
pub async fn sign_in(app: &Router, query: &str) -> String {
    let resp = post_form(
        app,
        &format!("/authenticate?{query}"),
        &[("id", USER_ID), ("passwd", PASSWORD)],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_text(resp).await
}

/// Run the front channel through consent and return the callback URL.
pub async fn approved_callback(app: &Router, query: &str) -> Url {
    let resp = get(app, &format!("/authorize?{query}")).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/authenticate?{query}"));

    let html = sign_in(app, query).await;
    let (yes, _) = consent_links(&html);

    let resp = get(app, &yes).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    Url::parse(&location(&resp)).expect("absolute callback url")
}

pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Code from an approved callback for the default request.
pub async fn issued_code(app: &Router, extra: &[(&str, &str)]) -> String {
    let callback = approved_callback(app, &authorize_query(extra)).await;
    query_param(&callback, "code").expect("code in callback")
}
