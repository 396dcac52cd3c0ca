//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [server]                 # listener settings
//! [upstream]               # Otter.ai API settings
//! [cache]                  # session cache sizing
//! [credentials]            # fallback account for requests without credentials
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default port, matching the historical `PORT` default.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default Otter.ai API root.
pub const DEFAULT_UPSTREAM_URL: &str = "https://otter.ai/forward/api/v1/";

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default page size for speech listings.
pub const DEFAULT_PAGE_SIZE: u32 = 45;

/// Default session validity in seconds (30 minutes).
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

/// Default maximum number of cached sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Maps to the full TOML config file. All sections are optional so that
/// partial configs (e.g., project-local overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtterbridgeConfig {
    /// HTTP listener configuration.
    pub server: Option<ServerConfig>,

    /// Upstream API configuration.
    pub upstream: Option<UpstreamConfig>,

    /// Session cache configuration.
    pub cache: Option<CacheSection>,

    /// Fallback credentials.
    pub credentials: Option<CredentialsConfig>,
}

impl OtterbridgeConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: OtterbridgeConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }

        if other.upstream.is_some() {
            self.upstream = other.upstream;
        }

        if other.cache.is_some() {
            self.cache = other.cache;
        }

        if let Some(credentials) = other.credentials {
            self.credentials
                .get_or_insert_with(CredentialsConfig::default)
                .merge(credentials);
        }
    }

    /// Server settings, defaulted.
    pub fn server_or_default(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Upstream settings, defaulted.
    pub fn upstream_or_default(&self) -> UpstreamConfig {
        self.upstream.clone().unwrap_or_default()
    }

    /// Cache settings, defaulted.
    pub fn cache_or_default(&self) -> CacheSection {
        self.cache.clone().unwrap_or_default()
    }

    /// Fallback credentials, if both halves are configured.
    pub fn fallback_credentials(&self) -> Option<(&str, &str)> {
        self.credentials.as_ref().and_then(CredentialsConfig::pair)
    }

    /// Check values that parse fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        let upstream = self.upstream_or_default();
        if upstream.timeout_secs == 0 {
            return Err(invalid("upstream.timeout_secs", "must be at least 1"));
        }
        if upstream.page_size == 0 {
            return Err(invalid("upstream.page_size", "must be at least 1"));
        }

        let cache = self.cache_or_default();
        if cache.ttl_secs == 0 {
            return Err(invalid("cache.ttl_secs", "must be at least 1"));
        }
        if cache.max_sessions == 0 {
            return Err(invalid("cache.max_sessions", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Address to bind to.
    pub bind: String,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
    /// Enable request logging.
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            cors: true,
            request_logging: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upstream Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Upstream Otter.ai API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API root URL.
    pub base_url: String,
    /// Per-request timeout in seconds, logins included.
    pub timeout_secs: u64,
    /// Number of speeches requested per listing.
    pub page_size: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UpstreamConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// How long a login stays valid, in seconds.
    pub ttl_secs: u64,
    /// Maximum number of cached sessions.
    pub max_sessions: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl CacheSection {
    /// TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fallback Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Account used when a request carries no credentials of its own.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Account email.
    pub email: Option<String>,
    /// Account password.
    pub password: Option<String>,
}

impl CredentialsConfig {
    /// Overlay fields that are set in `other`.
    pub fn merge(&mut self, other: CredentialsConfig) {
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
    }

    /// Both halves, if both are non-empty.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }

    /// Whether a password is stored in this section.
    pub fn has_plaintext_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
