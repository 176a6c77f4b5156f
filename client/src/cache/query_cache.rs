//! # Query Cache
//!
//! Remote-data cache keyed by [`QueryKey`].
//!
//! ## Features
//! - In-flight deduplication: concurrent fetches of one key share a single request
//! - Coarse invalidation by [`ResourceKind`], with background refetch of observed keys
//! - Optimistic updates with rollback snapshots
//! - Stale-while-revalidate: a refetch keeps serving the previous value
//!
//! Values are stored type-erased; each key is always read back with the type it was
//! fetched with. Locks are never held across an `.await`.
//!
//! ## Example
//! ```no_run
//! # use client::cache::{QueryCache, QueryKey, QueryOptions, ResourceKind};
//! # async fn demo() -> Result<(), client::core::ApiError> {
//! let cache = QueryCache::new();
//! let key = QueryKey::new(ResourceKind::UserStats);
//! let points: i64 = cache
//!     .fetch(&key, QueryOptions::default(), || async { Ok(120_i64) })
//!     .await?;
//! cache.invalidate(ResourceKind::UserStats);
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::RwLock;

use super::key::{QueryKey, ResourceKind};
use crate::core::error::ApiError;
use crate::debug;

/// Type-erased cached value
pub(crate) type QueryValue = Arc<dyn Any + Send + Sync>;

type FetchResult = Result<QueryValue, ApiError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;
type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;

/// Per-query refresh behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a successful result counts as fresh; zero means always revalidate
    pub stale_time: Duration,
    /// Poll while observed
    pub refetch_interval: Option<Duration>,
    /// Revalidate when the front end regains focus
    pub refetch_on_focus: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            refetch_interval: None,
            refetch_on_focus: false,
        }
    }
}

impl QueryOptions {
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn refetch_every(mut self, interval: Duration) -> Self {
        self.refetch_interval = Some(interval);
        self
    }

    pub fn refetch_on_focus(mut self) -> Self {
        self.refetch_on_focus = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched
    Idle,
    /// First fetch in flight, nothing to show yet
    Loading,
    Success,
    /// Last fetch failed and there is no earlier value
    Error,
}

/// Snapshot of one cache entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub status: QueryStatus,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub updated_at: Option<Instant>,
    pub error: Option<ApiError>,
    pub observers: usize,
}

/// Snapshot taken by [`QueryCache::optimistic_update`]
#[derive(Clone)]
#[must_use = "an optimistic update without its rollback cannot be undone"]
pub struct Rollback {
    key: QueryKey,
    previous: QueryValue,
}

impl Rollback {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl std::fmt::Debug for Rollback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rollback").field("key", &self.key).finish()
    }
}

struct InFlight {
    id: u64,
    future: SharedFetch,
    /// Started while the entry was already invalidated
    covers_invalidation: bool,
}

struct Entry {
    data: Option<QueryValue>,
    updated_at: Option<Instant>,
    error: Option<ApiError>,
    invalidated: bool,
    in_flight: Option<InFlight>,
    fetcher: Option<Fetcher>,
    observers: usize,
    options: QueryOptions,
}

impl Entry {
    fn new(options: QueryOptions) -> Self {
        Self {
            data: None,
            updated_at: None,
            error: None,
            invalidated: false,
            in_flight: None,
            fetcher: None,
            observers: 0,
            options,
        }
    }

    fn is_stale(&self) -> bool {
        self.invalidated
            || self
                .updated_at
                .map_or(true, |at| at.elapsed() >= self.options.stale_time)
    }

    fn fresh_data(&self) -> Option<QueryValue> {
        match &self.data {
            Some(data) if !self.is_stale() => Some(data.clone()),
            _ => None,
        }
    }

    fn state(&self) -> QueryState {
        let is_fetching = self.in_flight.is_some();
        let status = match (&self.data, &self.error) {
            (Some(_), _) => QueryStatus::Success,
            (None, _) if is_fetching => QueryStatus::Loading,
            (None, Some(_)) => QueryStatus::Error,
            (None, None) => QueryStatus::Idle,
        };
        QueryState {
            status,
            is_fetching,
            is_stale: self.is_stale(),
            updated_at: self.updated_at,
            error: self.error.clone(),
            observers: self.observers,
        }
    }
}

#[derive(Default)]
struct CacheInner {
    entries: RwLock<HashMap<QueryKey, Entry>>,
    next_fetch_id: AtomicU64,
}

impl CacheInner {
    /// Store a finished fetch, unless it was superseded or cancelled meanwhile
    fn settle(&self, key: &QueryKey, id: u64, result: &FetchResult) {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(key) else {
            tracing::debug!(key = %key, "Entry cleared before fetch finished");
            return;
        };

        if entry.in_flight.as_ref().map(|f| f.id) != Some(id) {
            tracing::debug!(key = %key, fetch_id = id, "Discarding superseded fetch result");
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(value) => {
                entry.data = Some(value.clone());
                entry.updated_at = Some(Instant::now());
                entry.error = None;
                entry.invalidated = false;
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Query failed");
                entry.error = Some(e.clone());
            }
        }
    }
}

/// Shared handle to the query cache
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.read().len())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for `key`, fetching it if missing or stale
    ///
    /// A fetch already in flight for the key is joined instead of issuing a second
    /// request. The fetcher is remembered for later background refetches.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetcher: Fetcher = Arc::new(move || {
            let fut = fetcher();
            async move { fut.await.map(|value| Arc::new(value) as QueryValue) }.boxed()
        });

        let pending = {
            let mut entries = self.inner.entries.write();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(options));
            entry.options = options;
            entry.fetcher = Some(fetcher.clone());

            if let Some(data) = entry.fresh_data() {
                tracing::debug!(key = %key, "Cache hit");
                return downcast(key, data);
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    tracing::debug!(key = %key, "Joining in-flight fetch");
                    in_flight.future.clone()
                }
                None => self.start_fetch(key, entry, fetcher),
            }
        };

        let value = pending.await?;
        downcast(key, value)
    }

    /// Cached value for `key`, fresh or not
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let data = self.inner.entries.read().get(key)?.data.clone()?;
        data.downcast_ref::<T>().cloned()
    }

    pub fn state(&self, key: &QueryKey) -> Option<QueryState> {
        self.inner.entries.read().get(key).map(Entry::state)
    }

    /// Write a value directly, as if it had just been fetched
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) {
        let mut entries = self.inner.entries.write();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(QueryOptions::default()));
        entry.data = Some(Arc::new(value));
        entry.updated_at = Some(Instant::now());
        entry.error = None;
        entry.invalidated = false;
    }

    /// Mark every query of `kind` stale and refetch the observed ones
    ///
    /// Marking happens before this returns, so a read issued right after (for
    /// example by the page navigated to next) never gets the old value as fresh.
    /// A fetch that was already running is abandoned: its callers still get its
    /// result, but it is not cached and later reads start a new request.
    /// Returns the number of entries marked.
    pub fn invalidate(&self, kind: ResourceKind) -> usize {
        self.invalidate_where(|key| key.kind == kind)
    }

    pub fn invalidate_key(&self, key: &QueryKey) -> usize {
        self.invalidate_where(|k| k == key)
    }

    fn invalidate_where(&self, matches: impl Fn(&QueryKey) -> bool) -> usize {
        let mut marked = 0;
        let refetches: Vec<SharedFetch> = {
            let mut entries = self.inner.entries.write();
            entries
                .iter_mut()
                .filter(|(key, _)| matches(key))
                .filter_map(|(key, entry)| {
                    marked += 1;
                    entry.invalidated = true;
                    // A fetch issued before the invalidation may carry pre-mutation data
                    if entry.in_flight.as_ref().is_some_and(|f| !f.covers_invalidation) {
                        entry.in_flight = None;
                        tracing::debug!(key = %key, "Dropped fetch issued before invalidation");
                    }
                    (entry.observers > 0).then(|| self.ensure_fetch(key, entry)).flatten()
                })
                .collect()
        };

        tracing::debug!(marked, refetching = refetches.len(), "Queries invalidated");
        self.drive(refetches);
        marked
    }

    /// Refetch `key` in the background with its remembered fetcher
    ///
    /// Joins a fetch already in flight. Returns false if the key has never been
    /// fetched.
    pub fn refetch(&self, key: &QueryKey) -> bool {
        let fetch = {
            let mut entries = self.inner.entries.write();
            match entries.get_mut(key) {
                Some(entry) if entry.fetcher.is_some() => {
                    if entry.in_flight.is_some() {
                        return true;
                    }
                    self.ensure_fetch(key, entry)
                }
                _ => None,
            }
        };

        let started = fetch.is_some();
        self.drive(fetch.into_iter().collect());
        started
    }

    /// The front end regained focus: revalidate stale, observed, opted-in queries
    pub fn focus_gained(&self) -> usize {
        let refetches: Vec<SharedFetch> = {
            let mut entries = self.inner.entries.write();
            entries
                .iter_mut()
                .filter(|(_, e)| e.observers > 0 && e.options.refetch_on_focus && e.is_stale())
                .filter_map(|(key, entry)| self.ensure_fetch(key, entry))
                .collect()
        };

        let count = refetches.len();
        self.drive(refetches);
        count
    }

    /// Apply a predicted value to a cached query
    ///
    /// Any fetch in flight for the key is cancelled so it cannot overwrite the
    /// prediction. Returns `None` when there is no cached value of type `T`.
    pub fn optimistic_update<T>(
        &self,
        key: &QueryKey,
        update: impl FnOnce(&mut T),
    ) -> Option<Rollback>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.inner.entries.write();
        let entry = entries.get_mut(key)?;
        let previous = entry.data.clone()?;
        let mut value = previous.downcast_ref::<T>()?.clone();

        if entry.in_flight.take().is_some() {
            tracing::debug!(key = %key, "Cancelled in-flight fetch for optimistic update");
        }

        update(&mut value);
        entry.data = Some(Arc::new(value));
        tracing::debug!(key = %key, "Optimistic update applied");

        Some(Rollback {
            key: key.clone(),
            previous,
        })
    }

    /// Restore the value captured by [`QueryCache::optimistic_update`]
    pub fn rollback(&self, rollback: Rollback) {
        let mut entries = self.inner.entries.write();
        if let Some(entry) = entries.get_mut(&rollback.key) {
            entry.data = Some(rollback.previous);
            tracing::debug!(key = %rollback.key, "Optimistic update rolled back");
        }
    }

    /// Optimistically update `key`, run `mutation`, then settle
    ///
    /// On failure the prediction is rolled back; on success every kind in
    /// `invalidate` is invalidated.
    pub async fn mutate_optimistic<T, R, Fut>(
        &self,
        key: &QueryKey,
        update: impl FnOnce(&mut T),
        mutation: Fut,
        invalidate: &[ResourceKind],
    ) -> Result<R, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let rollback = self.optimistic_update(key, update);

        match mutation.await {
            Ok(result) => {
                for kind in invalidate {
                    self.invalidate(*kind);
                }
                Ok(result)
            }
            Err(e) => {
                if let Some(rollback) = rollback {
                    self.rollback(rollback);
                }
                Err(e)
            }
        }
    }

    /// Register an observer; observed keys are refetched on invalidation
    pub fn subscribe(&self, key: &QueryKey, options: QueryOptions) {
        let mut entries = self.inner.entries.write();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(options));
        entry.options = options;
        entry.observers += 1;
    }

    pub fn unsubscribe(&self, key: &QueryKey) {
        if let Some(entry) = self.inner.entries.write().get_mut(key) {
            entry.observers = entry.observers.saturating_sub(1);
        }
    }

    /// Drop every entry, e.g. on logout
    pub fn clear(&self) {
        let mut entries = self.inner.entries.write();
        tracing::info!(entries = entries.len(), "Query cache cleared");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a fetch for an entry that has a fetcher and none in flight
    fn ensure_fetch(&self, key: &QueryKey, entry: &mut Entry) -> Option<SharedFetch> {
        if entry.in_flight.is_some() {
            return None;
        }
        let fetcher = entry.fetcher.clone()?;
        Some(self.start_fetch(key, entry, fetcher))
    }

    fn start_fetch(&self, key: &QueryKey, entry: &mut Entry, fetcher: Fetcher) -> SharedFetch {
        let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let weak: Weak<CacheInner> = Arc::downgrade(&self.inner);
        let settle_key = key.clone();

        let future = async move {
            let start = Instant::now();
            let result = fetcher().await;
            tracing::debug!(
                key = %settle_key,
                fetch_id = id,
                ok = result.is_ok(),
                duration_ms = start.elapsed().as_millis(),
                "Fetch finished"
            );
            if let Some(inner) = weak.upgrade() {
                inner.settle(&settle_key, id, &result);
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            id,
            future: future.clone(),
            covers_invalidation: entry.invalidated,
        });
        future
    }

    /// Poll background fetches to completion
    fn drive(&self, fetches: Vec<SharedFetch>) {
        if fetches.is_empty() {
            return;
        }
        if !debug::has_runtime() {
            tracing::debug!(count = fetches.len(), "No runtime, refetch deferred to next read");
            return;
        }
        for fetch in fetches {
            debug::spawn_tracked("query_refetch", async move {
                let _ = fetch.await;
            });
        }
    }
}

fn downcast<T: Clone + 'static>(key: &QueryKey, value: QueryValue) -> Result<T, ApiError> {
    value.downcast_ref::<T>().cloned().ok_or_else(|| {
        tracing::error!(key = %key, "Cached value has an unexpected type");
        ApiError::Decode(format!("cached value for {} has an unexpected type", key))
    })
}
