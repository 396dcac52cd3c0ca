//! Test doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use otterbridge_client::{
    Error as ClientError, SharedTranscriptApi, Speaker, Speech, TranscriptApi, TranscriptSegment,
};
use otterbridge_session::{AuthError, Authenticator, CacheConfig, Credential, SessionCache};
use serde_json::{Value, json};

use crate::config::ServerConfig;
use crate::state::AppState;

pub const EMAIL: &str = "a@x.com";
pub const PASSWORD: &str = "correct";

/// Upstream session backed by canned data.
#[derive(Debug)]
pub struct FakeApi {
    pub user_id: String,
    /// When set, every call fails with an upstream 401.
    pub expired: bool,
}

impl FakeApi {
    pub fn speeches() -> Vec<Speech> {
        vec![
            Speech {
                speech_id: "s1".into(),
                title: Some("Standup".into()),
                duration: Some(900.0),
                created_at: Some(1_700_000_000),
                process_finished: Some(true),
                ..Default::default()
            },
            Speech {
                speech_id: "s2".into(),
                title: Some("Silent".into()),
                ..Default::default()
            },
        ]
    }
}

#[async_trait]
impl TranscriptApi for FakeApi {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn speeches(&self) -> otterbridge_client::Result<Vec<Speech>> {
        if self.expired {
            return Err(ClientError::Auth("session expired".into()));
        }
        Ok(Self::speeches())
    }

    async fn speech(&self, speech_id: &str) -> otterbridge_client::Result<Speech> {
        match speech_id {
            "s1" => Ok(Speech {
                transcripts: Some(vec![
                    TranscriptSegment {
                        transcript: "Good morning.".into(),
                        start_offset: Some(0),
                        end_offset: Some(1200),
                        speaker_id: Some(1),
                    },
                    TranscriptSegment {
                        transcript: "Let's begin.".into(),
                        start_offset: Some(1200),
                        end_offset: Some(2000),
                        speaker_id: Some(2),
                    },
                ]),
                speakers: Some(vec![Speaker {
                    id: Some(1),
                    speaker_name: Some("Ada".into()),
                }]),
                ..Self::speeches()[0].clone()
            }),
            "s2" => Ok(Self::speeches()[1].clone()),
            other => Err(ClientError::NotFound(format!("speech {other}"))),
        }
    }

    async fn search(&self, query: &str) -> otterbridge_client::Result<Vec<Value>> {
        Ok(vec![json!({"speech_id": "s1", "matched": query})])
    }
}

/// Accepts exactly one credential and counts logins.
#[derive(Debug, Default)]
pub struct FakeAuthenticator {
    pub logins: AtomicUsize,
    pub expired_sessions: bool,
}

impl FakeAuthenticator {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    type Handle = SharedTranscriptApi;

    async fn login(&self, credential: &Credential) -> Result<SharedTranscriptApi, AuthError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        if credential.identifier() == EMAIL && credential.secret() == PASSWORD {
            Ok(Arc::new(FakeApi {
                user_id: "42".into(),
                expired: self.expired_sessions,
            }))
        } else {
            Err(AuthError::Rejected("Email and/or password are incorrect".into()))
        }
    }
}

/// State around a fresh fake authenticator.
pub fn state_with(authenticator: Arc<FakeAuthenticator>, config: ServerConfig) -> AppState {
    let cache = SessionCache::new(CacheConfig::new(), authenticator as Arc<crate::DynAuthenticator>);
    AppState::new(cache, config.with_request_logging(false))
}

pub fn credential_body() -> String {
    json!({"email": EMAIL, "password": PASSWORD}).to_string()
}
