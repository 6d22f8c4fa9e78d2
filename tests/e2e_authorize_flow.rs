use axum::http::{StatusCode, header};
use oidc_codeflow::application::ports::security::IdTokenVerifier;
use oidc_codeflow::infrastructure::security::token::JwksIdTokenVerifier;
use url::Url;

mod support;
use support::*;

#[tokio::test]
async fn code_flow_issues_a_verifiable_id_token() {
    let provider = make_provider();
    let app = &provider.router;

    let callback = approved_callback(app, &authorize_query(&[])).await;
    assert!(callback.as_str().starts_with(&format!("{REDIRECT_URI}?")));
    assert_eq!(query_param(&callback, "state").as_deref(), Some(STATE));
    let code = query_param(&callback, "code").expect("code");

    let resp = exchange(app, &code, &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let (_, headers, json) = to_json(resp).await;
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
    assert!(!json["access_token"].as_str().unwrap().is_empty());

    let id_token = json["id_token"].as_str().expect("id_token");
    let claims = JwksIdTokenVerifier::new(ISSUER, CLIENT_ID)
        .verify(id_token, &provider.services.key_set(), Some(NONCE))
        .expect("valid id token");
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.sub, "userid");
    assert_eq!(claims.aud, CLIENT_ID);
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn replayed_code_is_rejected() {
    let provider = make_provider();
    let app = &provider.router;
    let code = issued_code(app, &[]).await;

    assert_eq!(exchange(app, &code, &[]).await.status(), StatusCode::OK);
    assert_error_response(
        exchange(app, &code, &[]).await,
        StatusCode::BAD_REQUEST,
        "invalid_grant",
    )
    .await;
}

#[tokio::test]
async fn authentication_form_carries_the_request_forward() {
    let provider = make_provider();
    let query = authorize_query(&[]);

    let resp = get(&provider.router, &format!("/authenticate?{query}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("name=\"id\""));
    assert!(html.contains("name=\"passwd\""));
    assert!(html.contains("action=\"/authenticate?"));
}

#[tokio::test]
async fn wrong_password_shows_the_form_again_without_a_code() {
    let provider = make_provider();
    let query = authorize_query(&[]);

    let resp = post_form(
        &provider.router,
        &format!("/authenticate?{query}"),
        &[("id", "userid"), ("passwd", "nope")],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::LOCATION).is_none());
    let html = body_text(resp).await;
    assert!(html.contains("Invalid ID or password."));
    assert!(!html.contains("/authorize/yes"));
}

#[tokio::test]
async fn consent_page_names_the_client_and_scope() {
    let provider = make_provider();
    let html = sign_in(&provider.router, &authorize_query(&[])).await;

    assert!(html.contains("Authorize app?"));
    assert!(html.contains("openid"));
    let (yes, no) = consent_links(&html);
    assert!(yes.starts_with("/authorize/yes?ticket="));
    assert!(no.starts_with("/authorize/no?ticket="));
}

#[tokio::test]
async fn denial_redirects_with_access_denied_and_state() {
    let provider = make_provider();
    let app = &provider.router;
    let html = sign_in(app, &authorize_query(&[])).await;
    let (_, no) = consent_links(&html);

    let resp = get(app, &no).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let callback = Url::parse(&location(&resp)).unwrap();
    assert_eq!(query_param(&callback, "error").as_deref(), Some("access_denied"));
    assert_eq!(query_param(&callback, "state").as_deref(), Some(STATE));
    assert_eq!(query_param(&callback, "code"), None);
}

#[tokio::test]
async fn consent_ticket_is_single_use() {
    let provider = make_provider();
    let app = &provider.router;
    let html = sign_in(app, &authorize_query(&[])).await;
    let (yes, no) = consent_links(&html);

    assert_eq!(get(app, &yes).await.status(), StatusCode::FOUND);
    assert_error_response(get(app, &yes).await, StatusCode::BAD_REQUEST, "invalid_request").await;
    assert_error_response(get(app, &no).await, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn consent_with_altered_redirect_uri_is_refused() {
    let provider = make_provider();
    let app = &provider.router;
    let html = sign_in(app, &authorize_query(&[])).await;
    let (yes, _) = consent_links(&html);
    let ticket = yes
        .trim_start_matches("/authorize/yes?ticket=")
        .split('&')
        .next()
        .unwrap()
        .to_string();

    let tampered = format!(
        "/authorize/yes?{}",
        serde_urlencoded::to_string([
            ("ticket", ticket.as_str()),
            ("redirect_uri", "http://evil.example/callback"),
        ])
        .unwrap()
    );
    assert_error_response(get(app, &tampered).await, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn missing_state_is_not_invented() {
    let provider = make_provider();
    let query = serde_urlencoded::to_string([
        ("response_type", "code"),
        ("client_id", CLIENT_ID),
        ("redirect_uri", REDIRECT_URI),
        ("scope", "openid"),
    ])
    .unwrap();

    let callback = approved_callback(&provider.router, &query).await;
    assert!(query_param(&callback, "code").is_some());
    assert_eq!(query_param(&callback, "state"), None);
}

#[tokio::test]
async fn unregistered_redirect_uri_never_redirects() {
    let provider = make_provider();
    let query = serde_urlencoded::to_string([
        ("response_type", "code"),
        ("client_id", CLIENT_ID),
        ("redirect_uri", "http://evil.example/callback"),
        ("scope", "openid"),
        ("state", STATE),
    ])
    .unwrap();

    assert_error_response(
        get(&provider.router, &format!("/authorize?{query}")).await,
        StatusCode::BAD_REQUEST,
        "invalid_request",
    )
    .await;
}

#[tokio::test]
async fn malformed_authorization_requests_are_rejected() {
    let provider = make_provider();
    let app = &provider.router;

    let cases = [
        // no client_id
        serde_urlencoded::to_string([
            ("response_type", "code"),
            ("redirect_uri", REDIRECT_URI),
            ("scope", "openid"),
        ])
        .unwrap(),
        // no openid scope
        serde_urlencoded::to_string([
            ("response_type", "code"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("scope", "profile"),
        ])
        .unwrap(),
        // implicit flow is not offered
        serde_urlencoded::to_string([
            ("response_type", "token"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("scope", "openid"),
        ])
        .unwrap(),
    ];

    for query in cases {
        assert_error_response(
            get(app, &format!("/authorize?{query}")).await,
            StatusCode::BAD_REQUEST,
            "invalid_request",
        )
        .await;
    }
}

#[tokio::test]
async fn unknown_client_is_unauthorized() {
    let provider = make_provider();
    let query = serde_urlencoded::to_string([
        ("response_type", "code"),
        ("client_id", "stranger"),
        ("redirect_uri", REDIRECT_URI),
        ("scope", "openid"),
    ])
    .unwrap();

    assert_error_response(
        get(&provider.router, &format!("/authorize?{query}")).await,
        StatusCode::BAD_REQUEST,
        "unauthorized_client",
    )
    .await;
}

#[tokio::test]
async fn approval_without_a_ticket_is_refused() {
    let provider = make_provider();
    let app = &provider.router;
    // signing in first does not let a bare approval through
    sign_in(app, &authorize_query(&[])).await;

    let bare = format!(
        "/authorize/yes?{}",
        serde_urlencoded::to_string([("redirect_uri", REDIRECT_URI)]).unwrap()
    );
    assert_error_response(get(app, &bare).await, StatusCode::BAD_REQUEST, "invalid_request").await;
    assert_error_response(
        get(app, "/authorize/yes?ticket=").await,
        StatusCode::BAD_REQUEST,
        "invalid_request",
    )
    .await;
}
