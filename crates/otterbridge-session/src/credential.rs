//! Credentials and the cache keys derived from them.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// An identifier/secret pair supplied by a caller.
///
/// Only lives in process memory. The secret is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    /// Create a credential from an identifier (e.g. an email) and a secret.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// The identifier half of the pair.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The secret half of the pair.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Check that both halves are present.
    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(Error::InvalidCredential("missing identifier".to_string()));
        }
        if self.secret.is_empty() {
            return Err(Error::InvalidCredential("missing secret".to_string()));
        }
        Ok(())
    }

    /// Derive the cache key for this credential.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive(self)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Key under which a login is cached.
///
/// Keeps the identifier and a SHA-256 digest of the secret as separate
/// fields, so no choice of characters inside either field can make two
/// different pairs share a key. The plaintext secret is never stored.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identifier: String,
    secret_digest: [u8; 32],
}

impl CacheKey {
    /// Derive the key for a credential.
    pub fn derive(credential: &Credential) -> Self {
        Self {
            identifier: credential.identifier.clone(),
            secret_digest: Sha256::digest(credential.secret.as_bytes()).into(),
        }
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}
