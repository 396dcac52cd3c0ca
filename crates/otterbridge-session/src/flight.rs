//! Registry of logins that are currently running.
//!
//! Each running login is represented by a [`Flight`]: the shared receiving
//! end of a oneshot channel that the login task completes. Every caller that
//! asks for the same key while the login runs clones the same `Flight`, so
//! they all observe one result.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::Shared;
use parking_lot::{Mutex, MutexGuard};

use crate::authenticator::AuthError;
use crate::credential::CacheKey;
use crate::error::{Error, Result};

/// A login in progress, awaitable by any number of callers.
pub(crate) type Flight<H> = Shared<oneshot::Receiver<Result<H>>>;

type FlightMap<H> = HashMap<CacheKey, Flight<H>>;

/// Shared map from cache key to the login running for it.
pub(crate) struct FlightRegistry<H> {
    flights: Arc<Mutex<FlightMap<H>>>,
}

impl<H> Clone for FlightRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            flights: Arc::clone(&self.flights),
        }
    }
}

impl<H: Clone> FlightRegistry<H> {
    pub(crate) fn new() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Lock the registry. Never hold the guard across an `.await`.
    pub(crate) fn lock(&self) -> MutexGuard<'_, FlightMap<H>> {
        self.flights.lock()
    }

    /// Number of logins currently running.
    pub(crate) fn len(&self) -> usize {
        self.flights.lock().len()
    }

    /// Create the channel for a new login.
    ///
    /// Returns the sender the login task completes, the flight waiters
    /// subscribe to, and a guard that keeps the registry consistent if the
    /// task dies before sending.
    pub(crate) fn open(
        &self,
        key: CacheKey,
    ) -> (oneshot::Sender<Result<H>>, Flight<H>, FlightGuard<H>) {
        let (sender, receiver) = oneshot::channel();
        let guard = FlightGuard {
            key: Some(key),
            registry: self.clone(),
        };
        (sender, receiver.shared(), guard)
    }
}

/// Removes a flight from the registry when its login task ends.
///
/// On the normal path [`FlightGuard::land`] removes the flight while the
/// registry lock is held. If the task panics or is aborted, `Drop` removes
/// it instead, and the dropped sender wakes every waiter with an error.
pub(crate) struct FlightGuard<H> {
    key: Option<CacheKey>,
    registry: FlightRegistry<H>,
}

impl<H: Clone> FlightGuard<H> {
    /// Run `publish` and remove the flight under a single registry lock.
    ///
    /// Anyone checking the registry afterwards sees either the published
    /// result or no flight, never a gap in between.
    pub(crate) fn land(mut self, publish: impl FnOnce()) {
        let mut flights = self.registry.lock();
        publish();
        if let Some(key) = self.key.take() {
            flights.remove(&key);
        }
    }
}

impl<H> Drop for FlightGuard<H> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.registry.flights.lock().remove(&key);
        }
    }
}

/// Wait for a flight to land.
pub(crate) async fn wait<H: Clone>(flight: Flight<H>) -> Result<H> {
    flight.await.unwrap_or_else(|_canceled| {
        Err(Error::Authentication(AuthError::Failed(
            "login task ended without a result".to_string(),
        )))
    })
}
