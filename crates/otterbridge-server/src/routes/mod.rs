//! API routes.

pub mod auth;
pub mod health;
pub mod search;
pub mod speeches;

pub use auth::{ClearCacheResponse, clear_cache_handler};
pub use health::{HealthResponse, health_routes};
pub use search::{SearchParams, SearchResponse, search_handler};
pub use speeches::{
    ListSpeechesResponse, SpeechDetail, SpeechResponse, SpeechSummary, TranscriptBody,
    TranscriptResponse, get_speech_handler, get_transcript_handler, list_speeches_handler,
};

use std::sync::Arc;

use axum::http::Uri;

use crate::credentials::UserSession;
use crate::error::ServerError;
use crate::state::AppState;

/// Convert an upstream failure into a response error.
///
/// A 401/403 from upstream means the cached session died before its TTL
/// ran out, so it is evicted and the next request logs in again. Only the
/// failing handle is evicted; a newer login for the same credential stays.
pub(crate) fn upstream_failure(
    state: &AppState,
    session: &UserSession,
    err: otterbridge_client::Error,
) -> ServerError {
    if err.is_auth_error() {
        let evicted = state
            .cache
            .evict_if(&session.credential, |cached| Arc::ptr_eq(cached, &session.api));
        tracing::info!(user = %session.user(), evicted, "Upstream rejected cached session");
    } else {
        tracing::warn!(user = %session.user(), error = %err, "Upstream call failed");
    }
    err.into()
}

/// Fallback for unknown routes.
pub async fn not_found_handler(uri: Uri) -> ServerError {
    ServerError::NotFound(format!("Route {} not found", uri.path()))
}
