//! Reusable query definitions: key, options and fetcher in one value

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::key::QueryKey;
use super::query_cache::{QueryCache, QueryOptions};
use crate::core::error::ApiError;

type TypedFetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// A query that can be fetched through the cache or observed by a [`super::QueryView`]
pub struct Query<T> {
    pub key: QueryKey,
    pub options: QueryOptions,
    fetcher: TypedFetcher<T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            options: self.options,
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish()
    }
}

impl<T> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(key: QueryKey, options: QueryOptions, fetcher: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self {
            key,
            options,
            fetcher: Arc::new(move || fetcher().boxed()),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn fetch(&self, cache: &QueryCache) -> Result<T, ApiError> {
        let fetcher = self.fetcher.clone();
        cache
            .fetch(&self.key, self.options, move || fetcher())
            .await
    }

    /// Cached value, without fetching
    pub fn peek(&self, cache: &QueryCache) -> Option<T> {
        cache.peek(&self.key)
    }
}
