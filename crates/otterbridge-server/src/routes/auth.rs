//! Session cache administration.

use axum::{Extension, Json, extract::State};
use otterbridge_session::Credential;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Response for clear cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub message: String,
    pub user: String,
    /// Whether a cached session existed.
    pub evicted: bool,
}

/// POST /api/auth/clear-cache - Drop the caller's cached session.
///
/// Evicts the credential the request resolved to, whichever source it came
/// from. Does not log in first; the next API call will.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
) -> Json<ClearCacheResponse> {
    let evicted = state.cache.evict(&credential);
    tracing::info!(user = %credential.identifier(), evicted, "Cleared cached session");

    Json(ClearCacheResponse {
        success: true,
        message: "Authentication cache cleared".to_string(),
        user: credential.identifier().to_string(),
        evicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Server;
    use crate::config::ServerConfig;
    use crate::credentials::{EMAIL_HEADER, PASSWORD_HEADER};
    use crate::testing::{EMAIL, FakeAuthenticator, PASSWORD, credential_body, state_with};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_clear_cache_forces_new_login() {
        let authenticator = Arc::new(FakeAuthenticator::default());
        let state = state_with(authenticator.clone(), ServerConfig::new());
        let app = Server::from_state(state.clone()).router();

        let request = |uri: &str| {
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(credential_body()))
                .unwrap()
        };

        app.clone().oneshot(request("/api/speeches")).await.unwrap();
        assert_eq!(state.cache.size(), 1);

        let response = app.clone().oneshot(request("/api/auth/clear-cache")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: ClearCacheResponse = serde_json::from_slice(&body).unwrap();
        assert!(json.evicted);
        assert_eq!(json.user, EMAIL);
        assert_eq!(state.cache.size(), 0);

        app.oneshot(request("/api/speeches")).await.unwrap();
        assert_eq!(authenticator.logins(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_with_header_credentials() {
        let state = state_with(Arc::default(), ServerConfig::new());
        state
            .cache
            .acquire(&Credential::new(EMAIL, PASSWORD))
            .await
            .unwrap();

        let response = Server::from_state(state.clone())
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/clear-cache")
                    .header(EMAIL_HEADER, EMAIL)
                    .header(PASSWORD_HEADER, PASSWORD)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache_does_not_log_in() {
        let authenticator = Arc::new(FakeAuthenticator::default());
        let state = state_with(authenticator.clone(), ServerConfig::new());

        let response = Server::from_state(state)
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/clear-cache")
                    .header(EMAIL_HEADER, "nobody@x.com")
                    .header(PASSWORD_HEADER, "whatever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(authenticator.logins(), 0);
    }
}
