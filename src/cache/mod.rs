//! Keyed cache for backend reads with request deduplication and
//! stale-while-revalidate.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use moka::sync::Cache;
use serde::Serialize;
use tokio::time::Instant;

use crate::api::{ApiError, ApiResult};

pub mod key;
pub mod observer;

pub use key::{QueryKey, keys};
pub use observer::{QueryObserver, Ticket};

/// Entries younger than this are served without touching the backend.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5);
/// Upper bound on stored responses across all sessions.
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;
/// Responses nobody read for this long are dropped.
pub const DEFAULT_IDLE_TIME: Duration = Duration::from_secs(300);

type Erased = Arc<dyn Any + Send + Sync>;
type InFlight = Shared<BoxFuture<'static, Result<Erased, ApiError>>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Default)]
struct Stored {
    data: Option<Erased>,
    updated_at: Option<Instant>,
    invalidated: bool,
    error: Option<ApiError>,
}

impl Stored {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated
            && self
                .updated_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }
}

struct Inner {
    stored: Cache<QueryKey, Stored>,
    /// Requests currently running, removed as soon as they settle.
    in_flight: Mutex<HashMap<QueryKey, (u64, InFlight)>>,
    stale_time: Duration,
    next_fetch_id: AtomicU64,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, (u64, InFlight)>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores the outcome of fetch `fetch_id` unless it was superseded.
    fn complete(&self, key: &QueryKey, fetch_id: u64, result: &Result<Erased, ApiError>) {
        let mut in_flight = self.lock();
        if in_flight.get(key).map(|(id, _)| *id) != Some(fetch_id) {
            log::debug!("Discarding superseded response for {key}");
            return;
        }
        in_flight.remove(key);

        let mut stored = self.stored.get(key).unwrap_or_default();
        match result {
            Ok(data) => {
                stored.data = Some(data.clone());
                stored.updated_at = Some(Instant::now());
                stored.invalidated = false;
                stored.error = None;
            }
            Err(err) => stored.error = Some(err.clone()),
        }
        self.stored.insert(key.clone(), stored);
    }
}

/// Application-wide query cache. Cloning shares the same store.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self::with_limits(stale_time, DEFAULT_MAX_ENTRIES, DEFAULT_IDLE_TIME)
    }

    /// Cache holding at most `max_entries` responses, each dropped after
    /// `idle_time` without a read.
    pub fn with_limits(stale_time: Duration, max_entries: u64, idle_time: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                stored: Cache::builder()
                    .max_capacity(max_entries)
                    .time_to_idle(idle_time)
                    .build(),
                in_flight: Mutex::new(HashMap::new()),
                stale_time,
                next_fetch_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.inner.stale_time
    }

    /// Returns the cached value for `key`, calling `fetcher` when needed.
    ///
    /// A fresh entry is returned as is. An entry that aged past the stale
    /// time is returned at once while a background task refreshes it. An
    /// invalidated or missing entry makes the caller wait for the fetch,
    /// sharing it with any concurrent caller of the same key.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> ApiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let in_flight = {
            let mut in_flight = self.inner.lock();

            if let Some(stored) = self.inner.stored.get(key) {
                if let Some(data) = stored.data.clone() {
                    if stored.is_fresh(self.inner.stale_time) {
                        return downcast(key, data);
                    }
                    if !stored.invalidated {
                        if !in_flight.contains_key(key) {
                            log::debug!("Revalidating stale entry {key}");
                            let refresh = self.start(key, &mut in_flight, fetcher);
                            tokio::spawn(refresh.map(drop));
                        }
                        return downcast(key, data);
                    }
                }
            }

            let joined = in_flight.get(key).map(|(_, shared)| shared.clone());
            match joined {
                Some(shared) => {
                    log::debug!("Joining in-flight request for {key}");
                    shared
                }
                None => self.start(key, &mut in_flight, fetcher),
            }
        };

        in_flight.await.and_then(|data| downcast(key, data))
    }

    fn start<T, F, Fut>(
        &self,
        key: &QueryKey,
        in_flight: &mut HashMap<QueryKey, (u64, InFlight)>,
        fetcher: F,
    ) -> InFlight
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let fetch_id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let owned_key = key.clone();
        let request = fetcher();

        let shared = async move {
            let result = request.await.map(|value| Arc::new(value) as Erased);
            inner.complete(&owned_key, fetch_id, &result);
            result
        }
        .boxed()
        .shared();

        in_flight.insert(key.clone(), (fetch_id, shared.clone()));
        shared
    }

    /// Marks every entry under `prefix` stale and detaches its in-flight
    /// request. Returns the number of stored entries touched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut in_flight = self.inner.lock();
        in_flight.retain(|key, _| !key.starts_with(prefix));

        let matching = self
            .inner
            .stored
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .collect::<Vec<_>>();
        for (key, stored) in &matching {
            self.inner.stored.insert(
                QueryKey::clone(key),
                Stored {
                    invalidated: true,
                    ..stored.clone()
                },
            );
        }

        log::debug!("Invalidated {} entries under {prefix}", matching.len());
        matching.len()
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        let in_flight = self.inner.lock();
        match self.inner.stored.get(key) {
            Some(stored) if stored.data.is_some() => QueryStatus::Ready,
            _ if in_flight.contains_key(key) => QueryStatus::Loading,
            Some(Stored {
                error: Some(err), ..
            }) => QueryStatus::Failed(err.message),
            _ => QueryStatus::Idle,
        }
    }

    /// Cached value for `key`, fresh or not, without fetching.
    pub fn peek<T>(&self, key: &QueryKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let data = self.inner.stored.get(key)?.data?;
        data.downcast::<T>().ok()
    }

    /// Number of stored responses once pending evictions are applied.
    pub fn entry_count(&self) -> u64 {
        self.inner.stored.run_pending_tasks();
        self.inner.stored.entry_count()
    }

    /// Number of requests still running.
    pub fn in_flight_count(&self) -> usize {
        self.inner.lock().len()
    }
}

fn downcast<T>(key: &QueryKey, data: Erased) -> ApiResult<Arc<T>>
where
    T: Send + Sync + 'static,
{
    data.downcast::<T>().map_err(|_| {
        log::error!("Cached value for {key} has an unexpected type");
        ApiError::transport(format!("cached value for {key} has an unexpected type"))
    })
}
