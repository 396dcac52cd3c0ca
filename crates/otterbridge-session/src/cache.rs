//! Session cache with TTL, LRU eviction and single-flight logins.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, trace, warn};

use crate::authenticator::Authenticator;
use crate::config::CacheConfig;
use crate::credential::{CacheKey, Credential};
use crate::error::Result;
use crate::flight::{self, FlightRegistry};

/// Entry stored in the cache.
#[derive(Debug, Clone)]
pub(crate) struct SessionEntry<H> {
    /// Authenticated handle returned by the login.
    pub(crate) handle: H,

    /// When the login that produced this handle completed.
    pub(crate) issued_at: Instant,
}

impl<H> SessionEntry<H> {
    /// Create a new entry issued now.
    pub(crate) fn new(handle: H) -> Self {
        Self {
            handle,
            issued_at: Instant::now(),
        }
    }

    /// Whether the entry is still inside its validity window.
    pub(crate) fn is_fresh(&self, ttl: Duration) -> bool {
        self.issued_at.elapsed() < ttl
    }
}

/// Inner state protected by a mutex.
struct CacheInner<H> {
    /// LRU map of logged-in handles.
    lru: LruCache<CacheKey, SessionEntry<H>>,
}

/// Cache of authenticated upstream handles, keyed by credential.
///
/// This cache provides:
/// - Reuse of a handle for `ttl` after its login
/// - Lazy expiry: stale entries are replaced on the next access
/// - Single flight: concurrent misses for one key share one login
/// - LRU eviction when `max_sessions` is reached
///
/// Locks are synchronous and never held across an `.await`; the only
/// suspension point is the login itself, which runs on its own task so that
/// a caller going away does not cancel it.
pub struct SessionCache<A: Authenticator + ?Sized> {
    inner: Arc<Mutex<CacheInner<A::Handle>>>,
    flights: FlightRegistry<A::Handle>,
    authenticator: Arc<A>,
    config: CacheConfig,
}

impl<A: Authenticator + ?Sized + 'static> SessionCache<A> {
    /// Create an empty cache that logs in through `authenticator`.
    pub fn new(config: CacheConfig, authenticator: Arc<A>) -> Self {
        let cap = NonZeroUsize::new(config.max_sessions).unwrap_or(NonZeroUsize::MIN);

        let inner = CacheInner {
            lru: LruCache::new(cap),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
            flights: FlightRegistry::new(),
            authenticator,
            config,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return a valid handle for `credential`, logging in if needed.
    ///
    /// A fresh cached handle is returned without contacting the upstream
    /// service. Otherwise the stale entry (if any) is dropped and a login is
    /// started, or joined if one is already running for the same key.
    pub async fn acquire(&self, credential: &Credential) -> Result<A::Handle> {
        credential.validate()?;
        let key = credential.cache_key();

        if let Some(handle) = self.lookup(&key) {
            return Ok(handle);
        }

        let flight = {
            let mut flights = self.flights.lock();

            // A login may have landed between the lookup above and taking the
            // registry lock.
            if let Some(handle) = self.lookup(&key) {
                return Ok(handle);
            }

            match flights.get(&key) {
                Some(flight) => {
                    debug!(user = %key, "Joining login already in flight");
                    flight.clone()
                }
                None => {
                    debug!(user = %key, "Session cache miss, starting login");
                    let flight = self.spawn_login(key.clone(), credential.clone());
                    flights.insert(key, flight.clone());
                    flight
                }
            }
        };

        flight::wait(flight).await
    }

    /// Drop the cached handle for `credential`, regardless of its age.
    ///
    /// Returns whether an entry was removed. Removing nothing is not an error.
    pub fn evict(&self, credential: &Credential) -> bool {
        if credential.validate().is_err() {
            return false;
        }
        let key = credential.cache_key();
        let removed = self.inner.lock().lru.pop(&key).is_some();
        if removed {
            debug!(user = %key, "Session evicted from cache");
        }
        removed
    }

    /// Drop the cached handle for `credential` only if `predicate` accepts it.
    ///
    /// Lets a caller that saw a handle fail evict that handle without
    /// discarding a newer one logged in since.
    pub fn evict_if(
        &self,
        credential: &Credential,
        predicate: impl FnOnce(&A::Handle) -> bool,
    ) -> bool {
        if credential.validate().is_err() {
            return false;
        }
        let key = credential.cache_key();
        let mut inner = self.inner.lock();

        let matches = inner
            .lru
            .peek(&key)
            .is_some_and(|entry| predicate(&entry.handle));
        if matches {
            inner.lru.pop(&key);
            debug!(user = %key, "Session evicted from cache");
        }
        matches
    }

    /// Check if a fresh handle is cached (without updating LRU order).
    pub fn contains(&self, credential: &Credential) -> bool {
        let key = credential.cache_key();
        let inner = self.inner.lock();
        inner
            .lru
            .peek(&key)
            .is_some_and(|entry| entry.is_fresh(self.config.ttl))
    }

    /// Raw number of stored entries, stale ones included.
    pub fn size(&self) -> usize {
        self.inner.lock().lru.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().lru.is_empty()
    }

    /// Drop every cached handle. Running logins are left alone.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let count = inner.lru.len();
        inner.lru.clear();
        debug!(count, "Session cache cleared");
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.size(),
            capacity: self.config.max_sessions,
            in_flight: self.flights.len(),
        }
    }

    /// Fast path: a fresh handle, or `None` after dropping any stale entry.
    fn lookup(&self, key: &CacheKey) -> Option<A::Handle> {
        let mut inner = self.inner.lock();

        match inner.lru.get(key) {
            Some(entry) if entry.is_fresh(self.config.ttl) => {
                trace!(user = %key, "Session found in cache");
                return Some(entry.handle.clone());
            }
            Some(_) => {}
            None => return None,
        }

        debug!(user = %key, "Session expired, removing from cache");
        inner.lru.pop(key);
        None
    }

    /// Start a login on its own task and return the flight to wait on.
    fn spawn_login(&self, key: CacheKey, credential: Credential) -> flight::Flight<A::Handle> {
        let (sender, flight, guard) = self.flights.open(key.clone());
        let authenticator = Arc::clone(&self.authenticator);
        let inner = Arc::clone(&self.inner);
        let span = info_span!("login", user = %key);

        let task = async move {
            let result = authenticator.login(&credential).await.map_err(Into::into);

            guard.land(|| match &result {
                Ok(handle) => store(&inner, key, handle.clone()),
                Err(e) => warn!(error = %e, "Authentication failed"),
            });

            sender.send(result).ok();
        };

        tokio::spawn(task.instrument(span));
        flight
    }
}

/// Insert a freshly issued handle, evicting the LRU entry if at capacity.
fn store<H>(inner: &Mutex<CacheInner<H>>, key: CacheKey, handle: H) {
    let mut inner = inner.lock();
    if let Some((evicted, _)) = inner.lru.push(key.clone(), SessionEntry::new(handle))
        && evicted != key
    {
        debug!(user = %evicted, "Evicting LRU session to make room");
    }
    info!(cache_size = inner.lru.len(), "Authenticated with upstream");
}

impl<A: Authenticator + ?Sized> Clone for SessionCache<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            flights: self.flights.clone(),
            authenticator: Arc::clone(&self.authenticator),
            config: self.config.clone(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of cached handles.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of logins currently running.
    pub in_flight: usize,
}
