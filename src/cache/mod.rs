//! Day-partitioned response cache with request coalescing.
//!
//! Entries expire at the first UTC midnight after they were populated;
//! leaderboard data is "as of day D" and must flip at the day boundary.
//! Concurrent misses on one key share a single computation. That
//! computation runs on its own task, so a caller that gives up waiting
//! does not stop it from populating the cache for everyone else.

pub mod clock;
pub mod key;

pub use clock::{next_utc_midnight, Clock, ManualClock, SystemClock};
pub use key::CacheKey;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error)]
pub enum CacheError<E> {
    #[error(transparent)]
    Compute(E),
    /// The computation task panicked or was cancelled by the runtime.
    #[error("cache computation aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

type Computation<V, E> = Shared<BoxFuture<'static, Result<V, CacheError<E>>>>;

struct Inner<V, E> {
    entries: DashMap<CacheKey, CacheEntry<V>>,
    in_flight: Mutex<HashMap<CacheKey, Computation<V, E>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone, E> Inner<V, E> {
    /// Fresh value for `key`, evicting it if it has expired.
    fn lookup(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<V> {
        let (fresh, value) = {
            let entry = self.entries.get(key)?;
            (now < entry.expires_at, entry.value.clone())
        };
        if fresh {
            return Some(value);
        }
        self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        None
    }
}

/// Removes the in-flight marker when the computation task ends, even by panic.
struct InFlightGuard<V, E> {
    inner: Arc<Inner<V, E>>,
    key: CacheKey,
}

impl<V, E> Drop for InFlightGuard<V, E> {
    fn drop(&mut self) {
        self.inner.in_flight.lock().remove(&self.key);
    }
}

pub struct TimeWindowedCache<V, E> {
    inner: Arc<Inner<V, E>>,
}

impl<V, E> Clone for TimeWindowedCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> TimeWindowedCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                in_flight: Mutex::new(HashMap::new()),
                clock,
            }),
        }
    }

    /// Return the cached value for `key`, or run `compute` once and cache its success.
    ///
    /// Failures are handed to every waiter of that computation but never stored.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<V, CacheError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        if let Some(value) = self.inner.lookup(&key, self.inner.clock.now()) {
            debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        let computation = {
            let mut in_flight = self.inner.in_flight.lock();
            match in_flight.get(&key).cloned() {
                Some(existing) => {
                    debug!(key = %key, "Joining in-flight computation");
                    existing
                }
                None => {
                    // A computation may have finished between the first lookup and the lock.
                    if let Some(value) = self.inner.lookup(&key, self.inner.clock.now()) {
                        return Ok(value);
                    }
                    debug!(key = %key, "Cache miss");
                    let computation = self.spawn_computation(key.clone(), compute());
                    in_flight.insert(key, computation.clone());
                    computation
                }
            }
        };

        computation.await
    }

    fn spawn_computation<Fut>(&self, key: CacheKey, fut: Fut) -> Computation<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
            key,
        };

        let handle = tokio::spawn(async move {
            let result = fut.await;
            if let Ok(value) = &result {
                let now = guard.inner.clock.now();
                let expires_at = next_utc_midnight(now);
                guard.inner.entries.retain(|_, entry| now < entry.expires_at);
                guard.inner.entries.insert(
                    guard.key.clone(),
                    CacheEntry {
                        value: value.clone(),
                        expires_at,
                    },
                );
                debug!(key = %guard.key, expires_at = %expires_at, "Cache populated");
            }
            drop(guard);
            result
        });

        async move {
            match handle.await {
                Ok(result) => result.map_err(CacheError::Compute),
                Err(join_err) => Err(CacheError::Aborted(join_err.to_string())),
            }
        }
        .boxed()
        .shared()
    }

    /// Number of stored entries, expired ones included until next touched.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    pub fn expires_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.inner.entries.get(key).map(|entry| entry.expires_at)
    }
}
