//! Keyed single-flight population.
//!
//! Each key holds either a ready entry or the shared future of the fetch
//! currently in flight. Concurrent misses on one key join the in-flight
//! fetch instead of issuing their own, and its outcome (success or
//! failure) is delivered to every waiter. Failures never populate the
//! map, so the next read after a failure fetches again.
//!
//! Dropping one waiter only drops its handle on the shared future; the
//! fetch itself stays installed and resumes when any remaining or new
//! caller polls it.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::api::ApiError;
use crate::clock::Clock;

use super::entry::CacheEntry;

type FetchFuture<V> = Shared<BoxFuture<'static, Result<V, ApiError>>>;

enum Slot<V> {
    Ready(CacheEntry<V>),
    Pending(FetchFuture<V>),
}

/// Map of cache keys to entries with populate-once semantics per key.
///
/// The mutex guards only map operations and is never held across an
/// await, so lookups on one key never block fetches for another.
pub struct FlightMap<K, V> {
    slots: Arc<Mutex<HashMap<K, Slot<V>>>>,
}

impl<K, V> FlightMap<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Look up `key`, populating it with `fetch` on a miss.
    ///
    /// Returns the value and whether it was served from a live entry.
    /// `fetch` is only polled by the caller that installs it; callers
    /// that find a fetch already in flight drop their own unpolled
    /// future and await the shared one.
    pub async fn get_or_populate<F>(
        &self,
        key: K,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        fetch: F,
    ) -> (Result<V, ApiError>, bool)
    where
        F: Future<Output = Result<V, ApiError>> + Send + 'static,
    {
        let shared = {
            let mut slots = self.slots.lock().expect("slot map lock poisoned");
            match slots.get(&key) {
                Some(Slot::Ready(entry)) if !entry.is_expired(clock.now()) => {
                    return (Ok(entry.value.clone()), true);
                }
                Some(Slot::Pending(in_flight)) => in_flight.clone(),
                // Vacant or expired: install a new fetch. The write-back
                // runs inside the shared future, so it executes exactly
                // once no matter how many callers await it.
                _ => {
                    let slots_handle = Arc::clone(&self.slots);
                    let write_key = key.clone();
                    let write_clock = Arc::clone(&clock);
                    let in_flight: FetchFuture<V> = async move {
                        let result = fetch.await;
                        let mut slots = slots_handle.lock().expect("slot map lock poisoned");
                        match &result {
                            Ok(value) => {
                                let entry =
                                    CacheEntry::new(value.clone(), write_clock.now(), ttl);
                                slots.insert(write_key, Slot::Ready(entry));
                            }
                            Err(_) => {
                                // No negative caching: clear the slot so
                                // the next read retries.
                                slots.remove(&write_key);
                            }
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    slots.insert(key, Slot::Pending(in_flight.clone()));
                    in_flight
                }
            }
        };

        (shared.await, false)
    }

    /// Expiration deadline of the live entry for `key`, if any.
    #[cfg(test)]
    pub fn expires_at(&self, key: &K) -> Option<chrono::DateTime<chrono::Utc>> {
        let slots = self.slots.lock().expect("slot map lock poisoned");
        match slots.get(key) {
            Some(Slot::Ready(entry)) => Some(entry.expires_at),
            _ => None,
        }
    }
}

impl<K, V> Default for FlightMap<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
