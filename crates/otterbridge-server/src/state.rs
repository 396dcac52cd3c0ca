//! Application state shared across handlers.

use std::sync::Arc;

use otterbridge_client::SharedTranscriptApi;
use otterbridge_session::{Authenticator, SessionCache};

use crate::config::ServerConfig;

/// Any authenticator that yields transcript sessions.
pub type DynAuthenticator = dyn Authenticator<Handle = SharedTranscriptApi>;

/// Session cache used by the server.
pub type TranscriptCache = SessionCache<DynAuthenticator>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Logged-in upstream sessions, keyed by credential.
    pub cache: TranscriptCache,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state around an existing cache.
    pub fn new(cache: TranscriptCache, config: ServerConfig) -> Self {
        Self {
            cache,
            config: Arc::new(config),
        }
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
