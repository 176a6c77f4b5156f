//! # Query View
//!
//! One observer slot over the cache, as a page or widget would hold it.
//!
//! - Keeps showing the previous key's data while a new key loads
//! - `is_loading` only before the first value; later refetches are silent
//! - Only the most recently issued load may update the view, so a slow response
//!   for an old key never replaces a newer one
//! - Registers as an observer, so invalidations and the interval poller refresh it

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::key::QueryKey;
use super::query::Query;
use super::query_cache::QueryCache;
use crate::core::error::ApiError;
use crate::debug;

struct ViewState<T> {
    key: Option<QueryKey>,
    generation: u64,
    fetching: bool,
    data: Option<T>,
    data_key: Option<QueryKey>,
    error: Option<ApiError>,
    poller: Option<JoinHandle<()>>,
}

pub struct QueryView<T> {
    cache: QueryCache,
    state: Mutex<ViewState<T>>,
}

impl<T> QueryView<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(cache: QueryCache) -> Self {
        Self {
            cache,
            state: Mutex::new(ViewState {
                key: None,
                generation: 0,
                fetching: false,
                data: None,
                data_key: None,
                error: None,
                poller: None,
            }),
        }
    }

    /// Point the view at `query` and load it
    ///
    /// The result is always returned to the caller, but it only updates the view
    /// if no newer load was issued meanwhile.
    pub async fn load(&self, query: &Query<T>) -> Result<T, ApiError> {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            if state.key.as_ref() != Some(&query.key) {
                self.observe(&mut state, query);
            }
            state.fetching = true;
            state.generation
        };

        let result = query.fetch(&self.cache).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(key = %query.key, "Superseded load discarded");
            return result;
        }

        state.fetching = false;
        match &result {
            Ok(value) => {
                state.data = Some(value.clone());
                state.data_key = Some(query.key.clone());
                state.error = None;
            }
            Err(e) => state.error = Some(e.clone()),
        }
        result
    }

    /// Refetch the current key in the background
    pub fn refresh(&self) -> bool {
        match self.key() {
            Some(key) => self.cache.refetch(&key),
            None => false,
        }
    }

    /// Value to display: the cache's latest for the current key, else the
    /// previous key's value
    pub fn data(&self) -> Option<T> {
        let state = self.state.lock();
        state
            .key
            .as_ref()
            .and_then(|key| self.cache.peek::<T>(key))
            .or_else(|| state.data.clone())
    }

    /// First load in progress with nothing to show
    pub fn is_loading(&self) -> bool {
        self.is_fetching() && self.data().is_none()
    }

    pub fn is_fetching(&self) -> bool {
        let state = self.state.lock();
        state.fetching
            || state
                .key
                .as_ref()
                .and_then(|key| self.cache.state(key))
                .is_some_and(|s| s.is_fetching)
    }

    /// The displayed value belongs to an earlier key
    pub fn is_previous_data(&self) -> bool {
        let state = self.state.lock();
        match &state.key {
            Some(key) => {
                state.data_key.as_ref() != Some(key) && self.cache.peek::<T>(key).is_none()
            }
            None => false,
        }
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.lock().error.clone()
    }

    pub fn key(&self) -> Option<QueryKey> {
        self.state.lock().key.clone()
    }

    fn observe(&self, state: &mut ViewState<T>, query: &Query<T>) {
        if let Some(old) = state.key.take() {
            self.cache.unsubscribe(&old);
        }
        if let Some(poller) = state.poller.take() {
            poller.abort();
        }

        self.cache.subscribe(&query.key, query.options);
        state.poller = query
            .options
            .refetch_interval
            .and_then(|interval| self.start_poller(&query.key, interval));
        state.key = Some(query.key.clone());
    }

    fn start_poller(&self, key: &QueryKey, interval: Duration) -> Option<JoinHandle<()>> {
        if !debug::has_runtime() {
            tracing::debug!(key = %key, "No runtime, interval refetch disabled");
            return None;
        }

        let cache = self.cache.clone();
        let key = key.clone();
        Some(debug::spawn_tracked("query_poll", async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                tracing::debug!(key = %key, "Interval refetch");
                cache.refetch(&key);
            }
        }))
    }
}

impl<T> Drop for QueryView<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(key) = state.key.take() {
            self.cache.unsubscribe(&key);
        }
        if let Some(poller) = state.poller.take() {
            poller.abort();
        }
    }
}
