//! Error types for session cache operations.

use crate::authenticator::AuthError;

/// Error type for session cache operations.
///
/// Errors are `Clone` because a single failed login is delivered to every
/// caller that was waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The credential is missing its identifier or its secret.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The upstream service rejected the credential or the login failed.
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),
}

impl Error {
    /// Check if this is an input validation error.
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, Error::InvalidCredential(_))
    }
}

/// Result type for session cache operations.
pub type Result<T> = std::result::Result<T, Error>;
