//! A logged-in Otter.ai session.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::TranscriptApi;
use crate::client::{OtterClient, extract_error};
use crate::error::Result;
use crate::types::{SearchResponse, Speech, SpeechResponse, SpeechesResponse};

/// Client bound to one account after a successful login.
///
/// Carries the session cookies set by the login response; every request made
/// through it is authenticated as that account.
pub struct OtterSession {
    client: OtterClient,
    http: reqwest::Client,
    user_id: String,
    email: String,
}

impl OtterSession {
    pub(crate) fn new(client: OtterClient, http: reqwest::Client, user_id: String, email: String) -> Self {
        Self {
            client,
            http,
            user_id,
            email,
        }
    }

    /// Upstream user ID.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Email the session logged in with.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// GET an API path with the user ID attached, decoding the JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.client.url(path)?;
        let response = self
            .http
            .get(url)
            .query(&[("userid", self.user_id.as_str())])
            .query(query)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(extract_error(response).await)
        }
    }
}

impl fmt::Debug for OtterSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtterSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TranscriptApi for OtterSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn speeches(&self) -> Result<Vec<Speech>> {
        let page_size = self.client.page_size().to_string();
        let body: SpeechesResponse = self
            .get(
                "speeches",
                &[
                    ("folder", "0"),
                    ("page_size", page_size.as_str()),
                    ("source", "owned"),
                ],
            )
            .await?;
        tracing::debug!(user = %self.email, count = body.speeches.len(), "Fetched speeches");
        Ok(body.speeches)
    }

    async fn speech(&self, speech_id: &str) -> Result<Speech> {
        let body: SpeechResponse = self.get("speech", &[("otid", speech_id)]).await?;
        Ok(body.speech)
    }

    async fn search(&self, query: &str) -> Result<Vec<Value>> {
        let body: SearchResponse = self.get("speech_search", &[("query", query)]).await?;
        Ok(body.hits)
    }
}
