//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// No credentials in the body, the headers or the configuration.
    #[error(
        "Missing credentials: provide email and password in the request body, \
         the x-otter-email/x-otter-password headers, or the server configuration"
    )]
    MissingCredentials,

    /// Credentials were supplied but are incomplete.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Upstream rejected the credentials or the login failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream call failed after login.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<otterbridge_session::Error> for ServerError {
    fn from(e: otterbridge_session::Error) -> Self {
        match e {
            otterbridge_session::Error::InvalidCredential(msg) => ServerError::InvalidCredential(msg),
            otterbridge_session::Error::Authentication(e) => ServerError::Unauthorized(e.to_string()),
        }
    }
}

impl From<otterbridge_client::Error> for ServerError {
    fn from(e: otterbridge_client::Error) -> Self {
        match e {
            otterbridge_client::Error::NotFound(msg) => ServerError::NotFound(msg),
            otterbridge_client::Error::Auth(msg) => ServerError::Unauthorized(msg),
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ServerError {
    /// HTTP status and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::MissingCredentials => (StatusCode::BAD_REQUEST, "missing_credentials"),
            ServerError::InvalidCredential(_) => (StatusCode::BAD_REQUEST, "invalid_credential"),
            ServerError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "authentication_failed"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, code, error = %message, "Server error");
        } else {
            tracing::warn!(status = %status, code, error = %message, "Client error");
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
