//! Response types for the Otter.ai API.
//!
//! Upstream payloads carry many more fields than are modeled here; unknown
//! fields are ignored and most modeled ones are optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Speeches
// ─────────────────────────────────────────────────────────────────────────────

/// A recorded conversation ("speech") and, when fetched individually, its
/// transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Speech {
    /// Speech ID.
    pub speech_id: String,
    /// Title given in Otter.
    #[serde(default)]
    pub title: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Creation time (Unix seconds).
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Keyword summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Owner record, passed through untouched.
    #[serde(default)]
    pub owner: Option<Value>,
    /// Whether transcription has finished.
    #[serde(default)]
    pub process_finished: Option<bool>,
    /// Transcript segments. Only present on single-speech responses.
    #[serde(default, alias = "transcript")]
    pub transcripts: Option<Vec<TranscriptSegment>>,
    /// Speakers identified in the recording.
    #[serde(default)]
    pub speakers: Option<Vec<Speaker>>,
}

impl Speech {
    /// The transcript as plain text, segments joined by a space.
    ///
    /// `None` when the speech carries no transcript at all.
    pub fn transcript_text(&self) -> Option<String> {
        self.transcripts.as_ref().map(|segments| {
            segments
                .iter()
                .map(|s| s.transcript.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

/// One utterance in a transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Spoken text.
    pub transcript: String,
    /// Start offset in milliseconds.
    #[serde(default)]
    pub start_offset: Option<i64>,
    /// End offset in milliseconds.
    #[serde(default)]
    pub end_offset: Option<i64>,
    /// Speaker that said it, if identified.
    #[serde(default)]
    pub speaker_id: Option<i64>,
}

/// A speaker identified in a speech.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Speaker {
    /// Speaker ID.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default)]
    pub speaker_name: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    /// Numeric or string user ID, depending on the endpoint version.
    pub userid: Value,
}

impl LoginResponse {
    /// The user ID as a string.
    pub fn user_id(&self) -> Option<String> {
        match &self.userid {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeechesResponse {
    #[serde(default)]
    pub speeches: Vec<Speech>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeechResponse {
    pub speech: Speech,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Value>,
}
