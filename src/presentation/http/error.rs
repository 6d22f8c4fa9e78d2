use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error as seen by HTTP callers: a status plus an OAuth 2.0 error code.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        let message = err.to_string();
        let (status, code) = match err {
            ApplicationError::Domain(_) | ApplicationError::MalformedRequest(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            ApplicationError::AuthenticationFailure => (StatusCode::UNAUTHORIZED, "login_required"),
            ApplicationError::AccessDenied => (StatusCode::FORBIDDEN, "access_denied"),
            ApplicationError::InvalidGrant(_) => (StatusCode::BAD_REQUEST, "invalid_grant"),
            ApplicationError::UnauthorizedClient(_) => {
                (StatusCode::BAD_REQUEST, "unauthorized_client")
            }
            ApplicationError::UpstreamUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "temporarily_unavailable")
            }
            ApplicationError::UpstreamRejected(_) => (StatusCode::BAD_GATEWAY, "upstream_rejected"),
            ApplicationError::InvalidIdToken(_) => (StatusCode::BAD_GATEWAY, "invalid_id_token"),
            ApplicationError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            }
        };
        Self {
            status,
            code,
            message,
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ApplicationError> for HttpError {
    fn from(err: ApplicationError) -> Self {
        Self::from_error(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        } else {
            tracing::debug!(code = self.code, message = %self.message, "request rejected");
        }

        (
            self.status,
            [
                (header::CACHE_CONTROL, "no-store"),
                (header::PRAGMA, "no-cache"),
            ],
            Json(ErrorResponse {
                error: self.code.to_string(),
            }),
        )
            .into_response()
    }
}

/// OAuth 2.0 error body (RFC 6749 §5.2).
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
