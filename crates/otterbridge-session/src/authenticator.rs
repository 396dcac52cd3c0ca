//! The login seam between the cache and the upstream service.
//!
//! The cache never talks to the network itself. It calls an
//! [`Authenticator`] on a miss and stores whatever handle comes back. The
//! associated `Handle` type lets the upstream client hand out a rich,
//! shareable object (e.g. an `Arc<dyn TranscriptApi>`) without the cache
//! knowing anything about it.

use async_trait::async_trait;

use crate::credential::Credential;

/// Reasons a login attempt can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The upstream service refused the identifier/secret pair.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The login could not complete (network error, timeout, bad response).
    #[error("login failed: {0}")]
    Failed(String),
}

/// Performs logins against the upstream service.
///
/// Implementations are expected to bound each attempt with their own
/// timeout; the cache adds none and treats a timeout like any other failure.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticated handle returned by a successful login.
    ///
    /// Handles are shared between every caller holding the same credential,
    /// so they must be cheap to clone and only expose read operations.
    type Handle: Clone + Send + Sync + 'static;

    /// Log in with the given credential.
    async fn login(&self, credential: &Credential) -> Result<Self::Handle, AuthError>;
}
