//! Configuration for the session cache.

use std::time::Duration;

/// Default maximum number of cached logins before LRU eviction kicks in.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Default validity window of an authenticated handle (30 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Configuration for the session cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached handles before LRU eviction.
    pub max_sessions: usize,

    /// How long a handle stays valid after its login.
    /// Measured from the login, not from the last access.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of handles to cache.
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    /// Set the validity window for cached handles.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(1800));
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::new()
            .with_max_sessions(5)
            .with_ttl(Duration::from_secs(10));
        assert_eq!(config.max_sessions, 5);
        assert_eq!(config.ttl, Duration::from_secs(10));
    }
}
