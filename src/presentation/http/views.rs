// src/presentation/http/views.rs
//! Minimal HTML pages for the browser-facing steps of the flow.
use crate::application::dto::VerifiedLogin;
use crate::domain::authorization::AuthorizationRequest;
use axum::response::Html;
use std::fmt::Write as _;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    ))
}

/// Credential form; `query` is the original authorization request.
pub fn authentication_page(query: &str, error: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Sign in</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }
    let _ = write!(
        body,
        "<form action=\"/authenticate?{}\" method=\"POST\">\n\
         <label>ID: <input name=\"id\" placeholder=\"userid\"></label>\n\
         <label>Password: <input type=\"password\" name=\"passwd\" placeholder=\"passwd\"></label>\n\
         <input type=\"submit\" value=\"Sign in\">\n\
         </form>",
        escape(query)
    );
    page("Sign in", &body)
}

pub fn consent_page(request: &AuthorizationRequest, ticket: &str) -> Html<String> {
    let query = serde_urlencoded::to_string([
        ("ticket", ticket),
        ("redirect_uri", request.redirect_uri.as_str()),
    ])
    .unwrap_or_default();
    let query = escape(&query);

    let body = format!(
        "<h1>Authorize {client}?</h1>\n\
         <p>{client} is asking for: {scope}</p>\n\
         <a href=\"/authorize/yes?{query}\">YES</a>\n\
         <a href=\"/authorize/no?{query}\">NO</a>",
        client = escape(&request.client_id),
        scope = escape(&request.scope.join(" ")),
    );
    page("Consent", &body)
}

pub fn relying_party_index() -> Html<String> {
    page("Relying party", "<a href=\"/authz\">Start AuthZ</a>")
}

pub fn relying_party_login(login: &VerifiedLogin) -> Html<String> {
    let claims = &login.claims;
    let body = format!(
        "<h1>Signed in</h1>\n<dl>\n\
         <dt>subject</dt><dd>{}</dd>\n\
         <dt>issuer</dt><dd>{}</dd>\n\
         <dt>audience</dt><dd>{}</dd>\n\
         <dt>issued at</dt><dd>{}</dd>\n\
         <dt>expires</dt><dd>{}</dd>\n\
         <dt>token type</dt><dd>{}</dd>\n\
         <dt>access token</dt><dd><code>{}</code></dd>\n\
         <dt>id token</dt><dd><code>{}</code></dd>\n\
         </dl>",
        escape(&claims.sub),
        escape(&claims.iss),
        escape(&claims.aud),
        claims.iat,
        claims.exp,
        escape(&login.token.token_type),
        escape(&login.token.access_token),
        escape(&login.token.id_token),
    );
    page("Signed in", &body)
}

pub fn relying_party_error(code: &str, message: &str) -> Html<String> {
    let body = format!(
        "<h1>Error: {}</h1>\n<p>{}</p>\n<a href=\"/\">Start over</a>",
        escape(code),
        escape(message)
    );
    page("Error", &body)
}
