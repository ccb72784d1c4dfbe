//! In-memory query cache with request deduplication.
//!
//! Maps a query key to the last fetched result and keeps that result
//! visible while a newer fetch is in flight or after a fetch fails.
//!
//! - **Deduplication**: an in-flight table maps each key to a shared
//!   future; concurrent fetches of one key issue one request.
//! - **Freshness**: an entry is served without a request until it is
//!   invalidated or older than `stale_time` (unbounded by default).
//! - **Invalidation**: [`QueryCache::invalidate`] marks every key in a
//!   namespace as stale and detaches its in-flight requests, so the next
//!   access refetches.
//! - **Retry**: retryable errors are retried with exponential backoff
//!   before the failure is recorded.
//!
//! The cache is cheap to clone; clones share state. The internal mutex is
//! never held across an await point.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use notepad_core::{defaults, Error, Result};

/// Key of a cacheable query.
pub trait QueryKey: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// First key segment; invalidation operates on whole namespaces.
    fn namespace(&self) -> &str;
}

/// Failure shared by every caller waiting on the same request.
pub type QueryError = Arc<Error>;

pub type QueryResult<V> = std::result::Result<V, QueryError>;

/// Backoff schedule for retryable failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: defaults::QUERY_RETRY_COUNT,
            base_delay: Duration::from_millis(defaults::QUERY_RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(defaults::QUERY_RETRY_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt + 1`: `base * 2^attempt`, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryCacheConfig {
    /// Age after which an entry is refetched on access. `None` keeps
    /// entries fresh until invalidated.
    pub stale_time: Option<Duration>,
    pub retry: RetryPolicy,
}

impl QueryCacheConfig {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = Some(stale_time);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data and no error yet.
    Pending,
    Success,
    /// The last fetch failed; earlier data, if any, is still present.
    Error,
}

/// Snapshot of one cache entry for display.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: Option<V>,
    pub error: Option<QueryError>,
    pub updated_at: Option<Instant>,
    pub invalidated: bool,
    pub fetching: bool,
}

impl<V> CacheEntry<V> {
    pub fn status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Pending
        }
    }
}

struct Slot<V> {
    data: Option<V>,
    error: Option<QueryError>,
    updated_at: Option<Instant>,
    invalidated: bool,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
        }
    }
}

type SharedFetch<V> = Shared<BoxFuture<'static, QueryResult<V>>>;

struct InFlight<V> {
    id: u64,
    future: SharedFetch<V>,
}

struct CacheState<K, V> {
    slots: HashMap<K, Slot<V>>,
    in_flight: HashMap<K, InFlight<V>>,
    next_id: u64,
}

impl<K: QueryKey, V: Clone> CacheState<K, V> {
    fn fresh_data(&self, key: &K, stale_time: Option<Duration>) -> Option<V> {
        let slot = self.slots.get(key)?;
        if slot.invalidated {
            return None;
        }
        let data = slot.data.as_ref()?;
        if let (Some(limit), Some(at)) = (stale_time, slot.updated_at) {
            if at.elapsed() >= limit {
                return None;
            }
        }
        Some(data.clone())
    }
}

/// Keyed query cache.
pub struct QueryCache<K, V> {
    state: Arc<Mutex<CacheState<K, V>>>,
    config: Arc<QueryCacheConfig>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        }
    }
}

impl<K: QueryKey, V: Clone + Send + Sync + 'static> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self::new(QueryCacheConfig::default())
    }
}

impl<K: QueryKey, V: Clone + Send + Sync + 'static> QueryCache<K, V> {
    pub fn new(config: QueryCacheConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                slots: HashMap::new(),
                in_flight: HashMap::new(),
                next_id: 0,
            })),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    /// Return the cached value for `key`, or run `fetcher` to get one.
    ///
    /// Fresh data is served without calling `fetcher`. If a request for
    /// `key` is already running, this call waits on it instead of starting
    /// another. Failures keep whatever data the entry already held.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> QueryResult<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let (id, future) = {
            let mut guard = self.lock();
            let state = &mut *guard;

            if let Some(data) = state.fresh_data(&key, self.config.stale_time) {
                debug!(key = ?key, "Query cache HIT");
                return Ok(data);
            }

            match state.in_flight.get(&key) {
                Some(flight) => {
                    debug!(key = ?key, "Query cache DEDUP: joining in-flight request");
                    (flight.id, flight.future.clone())
                }
                None => {
                    let id = state.next_id;
                    state.next_id += 1;
                    let future = run_with_retry(key.clone(), self.config.retry.clone(), fetcher)
                        .boxed()
                        .shared();
                    state.in_flight.insert(
                        key.clone(),
                        InFlight {
                            id,
                            future: future.clone(),
                        },
                    );
                    debug!(key = ?key, "Query cache MISS: fetching");
                    (id, future)
                }
            }
        };

        let result = future.await;
        self.record(&key, id, &result);
        result
    }

    /// Store the outcome of request `id`, unless it was detached by an
    /// invalidation or already stored by another waiter.
    fn record(&self, key: &K, id: u64, result: &QueryResult<V>) {
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.in_flight.get(key).map(|flight| flight.id) != Some(id) {
            return;
        }
        state.in_flight.remove(key);

        let slot = state.slots.entry(key.clone()).or_default();
        match result {
            Ok(data) => {
                slot.data = Some(data.clone());
                slot.error = None;
                slot.updated_at = Some(Instant::now());
                slot.invalidated = false;
            }
            Err(err) => {
                slot.error = Some(Arc::clone(err));
            }
        }
    }

    /// Mark every entry in `namespace` stale and detach its in-flight
    /// requests. Cached data stays readable. Returns the number of entries
    /// marked.
    pub fn invalidate(&self, namespace: &str) -> usize {
        let mut guard = self.lock();
        let state = &mut *guard;

        let mut marked = 0;
        for (key, slot) in state.slots.iter_mut() {
            if key.namespace() == namespace {
                slot.invalidated = true;
                marked += 1;
            }
        }

        let before = state.in_flight.len();
        state.in_flight.retain(|key, _| key.namespace() != namespace);

        debug!(
            namespace,
            marked,
            detached = before - state.in_flight.len(),
            "Query cache INVALIDATE"
        );
        marked
    }

    /// Snapshot of the entry for `key`, if it was ever fetched.
    pub fn entry(&self, key: &K) -> Option<CacheEntry<V>> {
        let state = self.lock();
        let fetching = state.in_flight.contains_key(key);
        match state.slots.get(key) {
            Some(slot) => Some(CacheEntry {
                data: slot.data.clone(),
                error: slot.error.clone(),
                updated_at: slot.updated_at,
                invalidated: slot.invalidated,
                fetching,
            }),
            None if fetching => Some(CacheEntry {
                data: None,
                error: None,
                updated_at: None,
                invalidated: false,
                fetching,
            }),
            None => None,
        }
    }

    pub fn has_data(&self, key: &K) -> bool {
        self.lock()
            .slots
            .get(key)
            .is_some_and(|slot| slot.data.is_some())
    }

    /// Whether `key` would be served without a request.
    pub fn is_fresh(&self, key: &K) -> bool {
        self.lock()
            .fresh_data(key, self.config.stale_time)
            .is_some()
    }

    /// Number of keys with a stored outcome.
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_with_retry<K, V, F, Fut>(key: K, policy: RetryPolicy, fetcher: F) -> QueryResult<V>
where
    K: QueryKey,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<V>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                warn!(
                    key = ?key,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Query failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                warn!(key = ?key, attempts = attempt + 1, error = %err, "Query failed");
                return Err(Arc::new(err));
            }
        }
    }
}
