// src/presentation/http/controllers/mod.rs
pub mod authorize;
pub mod discovery;
pub mod relying_party;
pub mod token;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302 Found` with `Location`; axum's `Redirect` helpers only emit 303/307/308.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
