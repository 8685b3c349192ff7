//! Single-flight request coordinator
//!
//! For each cache key, at most one caller (the fetcher) performs the network
//! request. Callers arriving while it is in flight wait on the same result
//! slot instead of issuing their own request. Role arbitration and publishing
//! happen under a per-key lock that is never held across the fetch itself.

use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::{debug, error, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::slot::ResultSlot;
use super::storage::CacheStore;

/// In-flight fetch for one key
struct PendingRequest<V> {
    slot: ResultSlot<Option<V>>,
    waiters: AtomicUsize,
}

impl<V: Clone> PendingRequest<V> {
    fn new() -> Self {
        Self {
            slot: ResultSlot::new(),
            waiters: AtomicUsize::new(0),
        }
    }
}

/// Outcome of arbitration for a single call
enum Role<V> {
    Hit(V),
    Fetcher(Arc<PendingRequest<V>>),
    Waiter(Arc<PendingRequest<V>>),
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    fetches: AtomicU64,
    joins: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
    cancellations: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of coordinator activity since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorStats {
    /// Calls answered from the cache
    pub hits: u64,
    /// Network fetches started
    pub fetches: u64,
    /// Calls that joined someone else's fetch
    pub joins: u64,
    /// Fetches that produced no value
    pub failures: u64,
    /// Waiters that gave up after the wait timeout
    pub timeouts: u64,
    /// Fetchers or waiters stopped by cancellation
    pub cancellations: u64,
    /// Per-key locks created so far
    pub locks: usize,
    /// Keys with a fetch in flight
    pub in_flight: usize,
}

/// Deduplicates concurrent identical requests and caches their results.
///
/// One instance is built per process and shared behind an `Arc`. The lock
/// table grows with the number of distinct keys seen and is never pruned;
/// the key space here (recipe IDs, filter combinations) is small.
pub struct RequestCoordinator<V = String> {
    store: CacheStore<V>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    pending: DashMap<String, Arc<PendingRequest<V>>>,
    wait_timeout: Duration,
    shutdown: CancellationToken,
    counters: Counters,
}

impl<V: Clone> RequestCoordinator<V> {
    pub fn new(store: CacheStore<V>, wait_timeout: Duration) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            pending: DashMap::new(),
            wait_timeout,
            shutdown: CancellationToken::new(),
            counters: Counters::default(),
        }
    }

    pub fn store(&self) -> &CacheStore<V> {
        &self.store
    }

    /// Token that cancels every call made through [`Self::fetch_or_join`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Number of per-key locks created so far
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Number of keys with a fetch in flight
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Callers currently waiting on the in-flight fetch for `key`
    #[cfg(test)]
    pub fn waiter_count(&self, key: &str) -> usize {
        self.pending
            .get(key)
            .map(|pending| pending.waiters.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn stats(&self) -> CoordinatorStats {
        let c = &self.counters;
        CoordinatorStats {
            hits: c.hits.load(Ordering::Relaxed),
            fetches: c.fetches.load(Ordering::Relaxed),
            joins: c.joins.load(Ordering::Relaxed),
            failures: c.failures.load(Ordering::Relaxed),
            timeouts: c.timeouts.load(Ordering::Relaxed),
            cancellations: c.cancellations.load(Ordering::Relaxed),
            locks: self.lock_count(),
            in_flight: self.pending_count(),
        }
    }

    /// Return the cached value for `key`, or fetch it exactly once across
    /// all concurrent callers.
    ///
    /// `fetch` runs only if this caller becomes the fetcher. A `None` from
    /// `fetch` is shared with every waiter and nothing is cached.
    pub async fn fetch_or_join<F, Fut>(&self, key: &str, fetch: F) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        self.fetch_or_join_until(key, fetch, &self.shutdown).await
    }

    /// Like [`Self::fetch_or_join`], stopping early with `None` once `cancel`
    /// fires. A cancelled fetcher publishes `None` to its waiters.
    pub async fn fetch_or_join_until<F, Fut>(
        &self,
        key: &str,
        fetch: F,
        cancel: &CancellationToken,
    ) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        if cancel.is_cancelled() {
            return None;
        }

        match self.arbitrate(key) {
            Role::Hit(value) => {
                debug!("Cache hit for {}", key);
                Counters::bump(&self.counters.hits);
                Some(value)
            }
            Role::Fetcher(pending) => self.run_fetch(key, pending, fetch, cancel).await,
            Role::Waiter(pending) => self.join(key, pending, cancel).await,
        }
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(key) {
            return Arc::clone(&lock);
        }
        Arc::clone(&self.locks.entry(key.to_string()).or_default())
    }

    /// Decide this caller's role while holding the key's lock
    fn arbitrate(&self, key: &str) -> Role<V> {
        let lock = self.lock_for(key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = self.store.get(key) {
            return Role::Hit(entry.value);
        }

        match self.pending.entry(key.to_string()) {
            Entry::Occupied(occupied) => {
                let pending = Arc::clone(occupied.get());
                pending.waiters.fetch_add(1, Ordering::SeqCst);
                Role::Waiter(pending)
            }
            Entry::Vacant(vacant) => {
                let pending = Arc::new(PendingRequest::new());
                vacant.insert(Arc::clone(&pending));
                Role::Fetcher(pending)
            }
        }
    }

    async fn run_fetch<F, Fut>(
        &self,
        key: &str,
        pending: Arc<PendingRequest<V>>,
        fetch: F,
        cancel: &CancellationToken,
    ) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        debug!("Network fetch for {}", key);
        Counters::bump(&self.counters.fetches);

        let guard = PublishGuard {
            coordinator: self,
            key,
            pending,
            published: false,
        };

        let result = tokio::select! {
            result = fetch() => result,
            _ = cancel.cancelled() => {
                debug!("Fetch for {} cancelled", key);
                Counters::bump(&self.counters.cancellations);
                guard.publish(None);
                return None;
            }
        };

        if result.is_none() {
            Counters::bump(&self.counters.failures);
        }
        guard.publish(result.clone());
        result
    }

    async fn join(
        &self,
        key: &str,
        pending: Arc<PendingRequest<V>>,
        cancel: &CancellationToken,
    ) -> Option<V> {
        debug!("Waiting for in-flight request for {}", key);
        Counters::bump(&self.counters.joins);

        let _registration = WaiterRegistration(&pending.waiters);

        tokio::select! {
            result = tokio::time::timeout(self.wait_timeout, pending.slot.wait()) => match result {
                Ok(value) => value.flatten(),
                Err(_) => {
                    warn!(
                        "Timed out after {:?} waiting for in-flight request for {}",
                        self.wait_timeout, key
                    );
                    Counters::bump(&self.counters.timeouts);
                    None
                }
            },
            _ = cancel.cancelled() => {
                debug!("Wait for {} cancelled", key);
                Counters::bump(&self.counters.cancellations);
                None
            }
        }
    }

    /// Store (on success), retire the pending record, then wake the waiters.
    ///
    /// Runs under the key's lock so a caller arriving afterwards sees either
    /// the cached value or an idle key, never a finished pending record.
    fn publish(&self, key: &str, pending: &Arc<PendingRequest<V>>, result: Option<V>) {
        let lock = self.lock_for(key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = &result {
            self.store.put(key, value.clone());
        }
        self.pending
            .remove_if(key, |_, current| Arc::ptr_eq(current, pending));

        let waiters = pending.waiters.load(Ordering::SeqCst);
        if let Err(err) = pending.slot.set(result) {
            error!("Result for {} published twice: {}", key, err);
            return;
        }
        debug!("Published result for {} to {} waiter(s)", key, waiters);
    }
}

/// Publishes `None` if the fetcher goes away without publishing
struct PublishGuard<'a, V: Clone> {
    coordinator: &'a RequestCoordinator<V>,
    key: &'a str,
    pending: Arc<PendingRequest<V>>,
    published: bool,
}

impl<V: Clone> PublishGuard<'_, V> {
    fn publish(mut self, result: Option<V>) {
        self.published = true;
        self.coordinator.publish(self.key, &self.pending, result);
    }
}

impl<V: Clone> Drop for PublishGuard<'_, V> {
    fn drop(&mut self) {
        if self.published {
            return;
        }
        warn!("Fetch for {} was dropped before completing", self.key);
        Counters::bump(&self.coordinator.counters.cancellations);
        self.coordinator.publish(self.key, &self.pending, None);
    }
}

struct WaiterRegistration<'a>(&'a AtomicUsize);

impl Drop for WaiterRegistration<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
