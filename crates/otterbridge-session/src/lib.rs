//! Credential-keyed session cache for upstream logins.
//!
//! This crate provides the caching layer that sits between the HTTP facade
//! and the upstream transcription service:
//! - Authenticated handles are reused for a fixed validity window (TTL)
//! - Stale entries are replaced lazily on access, there is no sweeper task
//! - Concurrent logins for the same credential collapse into one attempt
//! - LRU eviction keeps the number of cached users bounded
//!
//! # Example
//!
//! ```rust,ignore
//! use otterbridge_session::{CacheConfig, Credential, SessionCache};
//!
//! let config = CacheConfig::default()
//!     .with_max_sessions(1000)
//!     .with_ttl(Duration::from_secs(1800));
//!
//! let cache = SessionCache::new(config, Arc::new(authenticator));
//! let handle = cache.acquire(&Credential::new("me@example.com", "hunter2")).await?;
//! ```

mod authenticator;
mod cache;
mod config;
mod credential;
mod error;
mod flight;

pub use authenticator::{AuthError, Authenticator};
pub use cache::{CacheStats, SessionCache};
pub use config::CacheConfig;
pub use credential::{CacheKey, Credential};
pub use error::{Error, Result};
