//! Speech and transcript endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use otterbridge_client::{Speaker, Speech, TranscriptSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::UserSession;
use crate::error::{Result, ServerError};
use crate::routes::upstream_failure;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Speech fields exposed in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSummary {
    pub id: String,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub created_at: Option<i64>,
    pub summary: Option<String>,
    pub owner: Option<Value>,
    pub process_finished: Option<bool>,
}

impl From<Speech> for SpeechSummary {
    fn from(speech: Speech) -> Self {
        Self {
            id: speech.speech_id,
            title: speech.title,
            duration: speech.duration,
            created_at: speech.created_at,
            summary: speech.summary,
            owner: speech.owner,
            process_finished: speech.process_finished,
        }
    }
}

/// Speech fields exposed when fetching one speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechDetail {
    pub id: String,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub created_at: Option<i64>,
    pub summary: Option<String>,
    pub transcript: Option<Vec<TranscriptSegment>>,
    pub speakers: Option<Vec<Speaker>>,
    pub owner: Option<Value>,
}

impl From<Speech> for SpeechDetail {
    fn from(speech: Speech) -> Self {
        Self {
            id: speech.speech_id,
            title: speech.title,
            duration: speech.duration,
            created_at: speech.created_at,
            summary: speech.summary,
            transcript: speech.transcripts,
            speakers: speech.speakers,
            owner: speech.owner,
        }
    }
}

/// Response for list speeches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSpeechesResponse {
    pub success: bool,
    pub count: usize,
    pub user: String,
    pub data: Vec<SpeechSummary>,
}

/// Response for get speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub success: bool,
    pub user: String,
    pub data: SpeechDetail,
}

/// Transcript as plain text plus the original segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptBody {
    pub text: String,
    pub detailed: Vec<TranscriptSegment>,
}

/// Response for get transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub success: bool,
    pub user: String,
    pub speech_id: String,
    pub title: Option<String>,
    pub transcript: TranscriptBody,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/speeches - List the account's speeches.
pub async fn list_speeches_handler(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ListSpeechesResponse>> {
    let speeches = session
        .api
        .speeches()
        .await
        .map_err(|e| upstream_failure(&state, &session, e))?;

    let data: Vec<SpeechSummary> = speeches.into_iter().map(SpeechSummary::from).collect();
    Ok(Json(ListSpeechesResponse {
        success: true,
        count: data.len(),
        user: session.user().to_string(),
        data,
    }))
}

/// POST /api/speeches/{id} - Fetch one speech with transcript and speakers.
pub async fn get_speech_handler(
    State(state): State<AppState>,
    Path(speech_id): Path<String>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<SpeechResponse>> {
    let speech = session
        .api
        .speech(&speech_id)
        .await
        .map_err(|e| upstream_failure(&state, &session, e))?;

    Ok(Json(SpeechResponse {
        success: true,
        user: session.user().to_string(),
        data: speech.into(),
    }))
}

/// POST /api/speeches/{id}/transcript - Fetch a speech's transcript.
pub async fn get_transcript_handler(
    State(state): State<AppState>,
    Path(speech_id): Path<String>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<TranscriptResponse>> {
    let speech = session
        .api
        .speech(&speech_id)
        .await
        .map_err(|e| upstream_failure(&state, &session, e))?;

    let text = speech
        .transcript_text()
        .ok_or_else(|| ServerError::NotFound(format!("No transcript found for speech {speech_id}")))?;

    Ok(Json(TranscriptResponse {
        success: true,
        user: session.user().to_string(),
        speech_id,
        title: speech.title,
        transcript: TranscriptBody {
            text,
            detailed: speech.transcripts.unwrap_or_default(),
        },
    }))
}
