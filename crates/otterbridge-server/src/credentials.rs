//! Credential resolution and session middleware.
//!
//! Every `/api` request names the Otter.ai account it acts for. The
//! credential is taken from the first source that supplies both halves:
//!
//! 1. JSON body fields `email` and `password`
//! 2. Headers `x-otter-email` and `x-otter-password`
//! 3. The server's fallback credential
//!
//! [`credentials_middleware`] resolves it and stores it in the request
//! extensions. [`session_middleware`] then exchanges it for a logged-in
//! session from the cache.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use otterbridge_client::SharedTranscriptApi;
use otterbridge_session::Credential;
use serde_json::Value;

use crate::error::ServerError;
use crate::state::AppState;

/// Header carrying the account email.
pub const EMAIL_HEADER: &str = "x-otter-email";

/// Header carrying the account password.
pub const PASSWORD_HEADER: &str = "x-otter-password";

/// Logged-in session for the current request.
#[derive(Debug, Clone)]
pub struct UserSession {
    /// Upstream session shared with every request for the same credential.
    pub api: SharedTranscriptApi,
    /// Credential the session was acquired with.
    pub credential: Credential,
}

impl UserSession {
    /// Email of the account.
    pub fn user(&self) -> &str {
        self.credential.identifier()
    }
}

/// Pick the credential for a request.
pub fn resolve_credential(
    headers: &HeaderMap,
    body: &[u8],
    fallback: Option<&Credential>,
) -> Result<Credential, ServerError> {
    let fields: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))?
    };

    // Only non-empty strings count; anything else falls through.
    let field = |name: &str| {
        fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    if let (Some(email), Some(password)) = (field("email"), field("password")) {
        return Ok(Credential::new(email, password));
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };
    if let (Some(email), Some(password)) = (header(EMAIL_HEADER), header(PASSWORD_HEADER)) {
        return Ok(Credential::new(email, password));
    }

    fallback.cloned().ok_or(ServerError::MissingCredentials)
}

/// Resolve the request's credential and insert it into the extensions.
///
/// The body is buffered and handed on unchanged.
pub async fn credentials_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let (parts, body) = request.into_parts();
    let bytes: Bytes = axum::body::to_bytes(body, state.config().max_body_size)
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read request body: {e}")))?;

    let credential = resolve_credential(
        &parts.headers,
        &bytes,
        state.config().fallback_credential.as_ref(),
    )?;
    tracing::debug!(user = %credential.identifier(), "Resolved credentials");

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(credential);

    Ok(next.run(request).await)
}

/// Acquire the upstream session for the resolved credential.
///
/// Must run inside [`credentials_middleware`].
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let credential = request
        .extensions()
        .get::<Credential>()
        .cloned()
        .ok_or_else(|| ServerError::Internal("request has no resolved credential".to_string()))?;

    let api = state.cache.acquire(&credential).await?;
    request
        .extensions_mut()
        .insert(UserSession { api, credential });

    Ok(next.run(request).await)
}
