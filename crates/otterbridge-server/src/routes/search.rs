//! Search endpoint.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::UserSession;
use crate::error::{Result, ServerError};
use crate::routes::upstream_failure;
use crate::state::AppState;

/// Query string for search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search term, used when the body has none.
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Default, Deserialize)]
struct SearchBody {
    #[serde(default)]
    query: Option<String>,
}

/// Response for search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub user: String,
    pub query: String,
    pub count: usize,
    pub data: Vec<Value>,
}

/// POST /api/search - Search the account's speeches.
///
/// The term comes from the body field `query`, else from `?q=`.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    Extension(session): Extension<UserSession>,
    body: Bytes,
) -> Result<Json<SearchResponse>> {
    // The credentials middleware has already rejected malformed JSON.
    let from_body = serde_json::from_slice::<SearchBody>(&body)
        .unwrap_or_default()
        .query;

    let query = from_body
        .filter(|q| !q.is_empty())
        .or(params.q.filter(|q| !q.is_empty()))
        .ok_or_else(|| {
            ServerError::BadRequest(
                "Missing query: provide \"query\" in the request body or ?q= in the URL"
                    .to_string(),
            )
        })?;

    let data = session
        .api
        .search(&query)
        .await
        .map_err(|e| upstream_failure(&state, &session, e))?;

    Ok(Json(SearchResponse {
        success: true,
        user: session.user().to_string(),
        query,
        count: data.len(),
        data,
    }))
}
