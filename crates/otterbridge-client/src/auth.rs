//! Session-cache integration.

use std::sync::Arc;

use async_trait::async_trait;
use otterbridge_session::{AuthError, Authenticator, Credential};

use crate::api::SharedTranscriptApi;
use crate::client::OtterClient;
use crate::error::Error;

/// Logs in to Otter.ai on behalf of the session cache.
///
/// The handle it produces is the logged-in [`OtterSession`](crate::OtterSession)
/// behind a [`SharedTranscriptApi`].
#[derive(Clone)]
pub struct OtterAuthenticator {
    client: OtterClient,
}

impl OtterAuthenticator {
    /// Create an authenticator that logs in through `client`.
    pub fn new(client: OtterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Authenticator for OtterAuthenticator {
    type Handle = SharedTranscriptApi;

    async fn login(&self, credential: &Credential) -> Result<SharedTranscriptApi, AuthError> {
        let session = self
            .client
            .login(credential.identifier(), credential.secret())
            .await?;
        Ok(Arc::new(session))
    }
}

impl From<Error> for AuthError {
    fn from(e: Error) -> Self {
        match e {
            Error::Auth(msg) => AuthError::Rejected(msg),
            other => AuthError::Failed(other.to_string()),
        }
    }
}
