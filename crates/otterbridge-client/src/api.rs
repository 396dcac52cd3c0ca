//! Read-only operations available on a logged-in session.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::Speech;

/// Business calls a logged-in session can make.
///
/// Handles are shared between every request using the same credential, so
/// the trait only exposes queries.
#[async_trait]
pub trait TranscriptApi: Send + Sync + fmt::Debug {
    /// Upstream user ID of the logged-in account.
    fn user_id(&self) -> &str;

    /// List the account's speeches.
    async fn speeches(&self) -> Result<Vec<Speech>>;

    /// Fetch one speech with its transcript.
    async fn speech(&self, speech_id: &str) -> Result<Speech>;

    /// Full-text search across the account's speeches.
    async fn search(&self, query: &str) -> Result<Vec<Value>>;
}

/// Shared, type-erased session handle.
pub type SharedTranscriptApi = Arc<dyn TranscriptApi>;
