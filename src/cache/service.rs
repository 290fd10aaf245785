//! Query Cache Service
//!
//! Process-wide cache shared by every collection accessor. Wraps the
//! [`CacheStore`] with in-flight de-duplication: one network call per key no
//! matter how many readers ask, with the result fanned out to all of them.
//!
//! Readers hold an interest guard while they wait. Dropping the guard
//! discards that reader's copy of the result; when the last guard for a
//! flight goes away before it finishes, the flight is aborted.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::cache::{current_timestamp_ms, CacheStats, CacheStore, Lookup, Payload};
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::query::{FetchKey, FetchStatus};

// == Result Types ==
/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSource {
    /// A network fetch started or joined by this read
    Network,
    /// A fresh cache entry, no network call
    Cache,
    /// The empty fallback page after repeated server errors
    Degraded,
}

/// Value returned by [`QueryCache::fetch`].
#[derive(Debug)]
pub struct Cached<T> {
    pub data: Arc<T>,
    pub source: CacheSource,
}

/// What a fetcher hands back to the cache.
///
/// Degraded values reach the waiting readers but are never stored.
#[derive(Debug)]
pub struct Fetched<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> Fetched<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn degraded(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

type FlightResult = std::result::Result<(Payload, CacheSource), DashboardError>;

// == Internal State ==
/// A registered fetch. Holds a receiver only to subscribe late joiners; the
/// sender lives in the task, so a task that dies closes the channel.
struct Flight {
    id: u64,
    waiters: usize,
    receiver: broadcast::Receiver<FlightResult>,
    /// Set right after the task is spawned, outside the lock
    abort: Option<AbortHandle>,
}

struct RecordedError {
    error: DashboardError,
    at: u64,
}

struct CacheState {
    store: CacheStore,
    flights: HashMap<FetchKey, Flight>,
    errors: HashMap<FetchKey, RecordedError>,
    next_flight_id: u64,
}

struct Shared {
    state: Mutex<CacheState>,
}

impl Shared {
    /// Records a finished flight. Only flights still registered for their
    /// key may write to the store; invalidated and abandoned ones are
    /// answered but not cached.
    ///
    /// Returns false when the flight was no longer registered.
    fn complete(&self, key: &FetchKey, flight_id: u64, result: &FlightResult) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if matches!(result, Ok((_, CacheSource::Degraded))) {
            state.store.stats_mut().record_degraded();
        }

        let registered = state
            .flights
            .get(key)
            .is_some_and(|flight| flight.id == flight_id);
        if !registered {
            debug!(key = %key, "fetch finished after invalidation; result not cached");
            return false;
        }
        state.flights.remove(key);

        match result {
            Ok((payload, CacheSource::Network)) => {
                state.errors.remove(key);
                state.store.set(key.clone(), Arc::clone(payload));
            }
            Ok(_) => {
                state.errors.remove(key);
            }
            Err(error) => {
                debug!(key = %key, error = %error, "fetch failed");
                state.errors.insert(
                    key.clone(),
                    RecordedError {
                        error: error.clone(),
                        at: current_timestamp_ms(),
                    },
                );
            }
        }
        true
    }
}

// == Completion ==
/// Publishes a flight's outcome exactly once.
///
/// Owned by the flight task. If the task is torn down before `finish` (the
/// fetcher panicked, or the flight was aborted) the drop publishes an
/// internal error, so waiters are answered and the key is unregistered.
struct Completion {
    shared: Arc<Shared>,
    key: FetchKey,
    flight_id: u64,
    sender: Option<broadcast::Sender<FlightResult>>,
}

impl Completion {
    fn finish(mut self, result: FlightResult) {
        self.publish(result);
    }

    fn publish(&mut self, result: FlightResult) -> bool {
        let Some(sender) = self.sender.take() else {
            return false;
        };
        let registered = self.shared.complete(&self.key, self.flight_id, &result);
        // Every reader may have left already
        let _ = sender.send(result);
        registered
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.sender.is_none() {
            return;
        }
        let error = DashboardError::Internal("fetch task ended without a result".to_string());
        if self.publish(Err(error)) {
            warn!(key = %self.key, "fetch task died before completing");
        }
    }
}

// == Interest ==
/// One reader's claim on a flight.
struct Interest {
    shared: Arc<Shared>,
    key: FetchKey,
    flight_id: u64,
}

impl Drop for Interest {
    fn drop(&mut self) {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        let abandoned = match state.flights.get_mut(&self.key) {
            Some(flight) if flight.id == self.flight_id => {
                flight.waiters = flight.waiters.saturating_sub(1);
                flight.waiters == 0
            }
            _ => false,
        };

        if abandoned {
            if let Some(flight) = state.flights.remove(&self.key) {
                if let Some(abort) = flight.abort {
                    abort.abort();
                }
                debug!(key = %self.key, "last reader gone; fetch abandoned");
            }
        }
    }
}

struct Waiter {
    receiver: broadcast::Receiver<FlightResult>,
    interest: Interest,
}

impl Waiter {
    fn flight_id(&self) -> u64 {
        self.interest.flight_id
    }

    async fn wait(mut self) -> FlightResult {
        self.receiver.recv().await.unwrap_or_else(|_| {
            Err(DashboardError::Internal(
                "fetch ended without a result".to_string(),
            ))
        })
    }
}

enum Admission<T, Fut> {
    Hit(Arc<T>),
    Wait(Waiter),
    Start {
        waiter: Waiter,
        completion: Completion,
        future: Fut,
    },
}

// == Query Cache ==
/// Shared cache service. Cheap to clone; all clones see the same state.
#[derive(Clone)]
pub struct QueryCache {
    shared: Arc<Shared>,
}

impl QueryCache {
    /// Wraps a store in the shared service.
    pub fn new(store: CacheStore) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(CacheState {
                    store,
                    flights: HashMap::new(),
                    errors: HashMap::new(),
                    next_flight_id: 0,
                }),
            }),
        }
    }

    /// Creates the service from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(
            config.max_entries,
            config.stale_window(),
            config.retention(),
        ))
    }

    // == Fetch ==
    /// Answers `key` from a fresh entry, or joins/starts the single network
    /// fetch for it.
    ///
    /// `fetcher` is only invoked when a new flight is started. The flight
    /// runs as its own task, so dropping this future abandons the read
    /// without cancelling the call for other readers.
    pub async fn fetch<T, F, Fut>(&self, key: &FetchKey, fetcher: F) -> Result<Cached<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Fetched<T>>> + Send + 'static,
    {
        let waiter = match self.admit(key, fetcher) {
            Admission::Hit(data) => {
                return Ok(Cached {
                    data,
                    source: CacheSource::Cache,
                })
            }
            Admission::Wait(waiter) => waiter,
            Admission::Start {
                waiter,
                completion,
                future,
            } => {
                let handle = tokio::spawn(async move {
                    let result: FlightResult = future.await.map(|fetched| {
                        let source = if fetched.degraded {
                            CacheSource::Degraded
                        } else {
                            CacheSource::Network
                        };
                        (Arc::new(fetched.value) as Payload, source)
                    });
                    completion.finish(result);
                });
                self.attach(key, waiter.flight_id(), handle.abort_handle());
                waiter
            }
        };

        let (payload, source) = waiter.wait().await?;
        let data = payload.downcast::<T>().map_err(|_| {
            DashboardError::Internal(format!("value fetched for {} has an unexpected type", key))
        })?;
        Ok(Cached { data, source })
    }

    /// Check-then-register under one lock so two readers can never both
    /// start a flight for the same key.
    fn admit<T, F, Fut>(&self, key: &FetchKey, fetcher: F) -> Admission<T, Fut>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Fetched<T>>> + Send + 'static,
    {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        if let Lookup::Fresh(payload) = state.store.lookup(key) {
            match payload.downcast::<T>() {
                Ok(data) => {
                    debug!(key = %key, "cache hit");
                    return Admission::Hit(data);
                }
                Err(_) => warn!(key = %key, "cached value has a different type; refetching"),
            }
        }

        if let Some(flight) = state.flights.get_mut(key) {
            flight.waiters += 1;
            let receiver = flight.receiver.resubscribe();
            let flight_id = flight.id;
            state.store.stats_mut().record_deduplicated();
            debug!(key = %key, waiters = flight.waiters, "joined fetch in flight");
            return Admission::Wait(self.waiter(receiver, key, flight_id));
        }

        let flight_id = state.next_flight_id;
        state.next_flight_id += 1;

        let (sender, receiver) = broadcast::channel(1);
        let completion = Completion {
            shared: Arc::clone(&self.shared),
            key: key.clone(),
            flight_id,
            sender: Some(sender),
        };
        let future = fetcher();

        let joined = receiver.resubscribe();
        state.flights.insert(
            key.clone(),
            Flight {
                id: flight_id,
                waiters: 1,
                receiver,
                abort: None,
            },
        );
        state.store.stats_mut().record_network_fetch();
        debug!(key = %key, "cache miss; starting network fetch");

        Admission::Start {
            waiter: self.waiter(joined, key, flight_id),
            completion,
            future,
        }
    }

    /// Records the abort handle of a freshly spawned flight. A flight
    /// detached in the meantime keeps running for its own waiters.
    fn attach(&self, key: &FetchKey, flight_id: u64, abort: AbortHandle) {
        let mut state = self.shared.state.lock();
        if let Some(flight) = state.flights.get_mut(key) {
            if flight.id == flight_id {
                flight.abort = Some(abort);
            }
        }
    }

    fn waiter(
        &self,
        receiver: broadcast::Receiver<FlightResult>,
        key: &FetchKey,
        flight_id: u64,
    ) -> Waiter {
        Waiter {
            receiver,
            interest: Interest {
                shared: Arc::clone(&self.shared),
                key: key.clone(),
                flight_id,
            },
        }
    }

    // == Direct Access ==
    /// Cached value for `key`, fresh or stale, if it has type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &FetchKey) -> Option<Arc<T>> {
        let state = self.shared.state.lock();
        state.store.get(key).and_then(|entry| entry.downcast::<T>())
    }

    /// Stores `value` under `key` as if it had just been fetched.
    pub fn set<T: Any + Send + Sync>(&self, key: FetchKey, value: T) {
        let mut state = self.shared.state.lock();
        state.store.set(key, Arc::new(value));
    }

    /// True when `key` has an entry inside the stale window.
    pub fn is_fresh(&self, key: &FetchKey) -> bool {
        let state = self.shared.state.lock();
        state
            .store
            .get(key)
            .is_some_and(|entry| state.store.is_fresh(entry))
    }

    // == Invalidation ==
    /// Drops every entry tagged `namespace` and detaches its in-flight
    /// fetches, so the next read under it goes to the network.
    pub fn invalidate_namespace(&self, namespace: &str) -> usize {
        let removed = self.invalidate_where(|key| key.is_under(namespace));
        info!(namespace, removed, "invalidated cache namespace");
        removed
    }

    /// Drops every entry whose key satisfies `predicate`.
    pub fn invalidate_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&FetchKey) -> bool,
    {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        let before = state.flights.len();
        state.flights.retain(|key, _| !predicate(key));
        let detached = before - state.flights.len();
        if detached > 0 {
            debug!(detached, "detached in-flight fetches from invalidated keys");
        }

        state.errors.retain(|key, _| !predicate(key));
        state.store.invalidate_where(&predicate)
    }

    // == Status ==
    /// Current lifecycle state of `key`.
    pub fn status(&self, key: &FetchKey) -> FetchStatus {
        let state = self.shared.state.lock();

        if state.flights.contains_key(key) {
            return FetchStatus::Loading;
        }
        if let Some(recorded) = state.errors.get(key) {
            return FetchStatus::from_error(&recorded.error);
        }
        match state.store.get(key) {
            Some(entry) => FetchStatus::Success {
                fresh: state.store.is_fresh(entry),
            },
            None => FetchStatus::Idle,
        }
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.shared.state.lock();
        let mut stats = state.store.stats();
        stats.in_flight = state.flights.len();
        stats
    }

    // == Cleanup ==
    /// Sweeps entries and recorded errors older than the retention window.
    pub fn cleanup_expired(&self) -> usize {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        let retention_ms = state.store.retention().as_millis() as u64;
        let now = current_timestamp_ms();
        state
            .errors
            .retain(|_, recorded| now.saturating_sub(recorded.at) < retention_ms);

        state.store.cleanup_expired()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
