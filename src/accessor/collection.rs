//! Collection Accessor
//!
//! `Collection<R>` is the one reader every dashboard list goes through:
//! filter state in, projected rows out, with the shared cache in between.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::{CacheSource, QueryCache};
use crate::error::Result;
use crate::query::{FetchKey, FetchStatus, Filter, FilterPatch, FilterStore};
use crate::remote::{CollectionPage, PageMeta, RemoteExecutor};
use crate::resources::Resource;

// == Collection View ==
/// What a consumer renders for one page.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView<Row> {
    pub rows: Vec<Row>,
    pub meta: PageMeta,
    /// Pagination controls only make sense past a single page
    pub show_pagination: bool,
    pub source: CacheSource,
}

impl<Row> CollectionView<Row> {
    fn project<R>(page: &CollectionPage<R::Item>, source: CacheSource) -> Self
    where
        R: Resource<Row = Row>,
    {
        Self {
            rows: page.list.iter().map(R::project).collect(),
            meta: page.meta.clone(),
            show_pagination: page.meta.last_page > 1,
            source,
        }
    }
}

// == Collection ==
/// Filtered, paged, cached reader for resource `R`.
pub struct Collection<R: Resource> {
    filters: FilterStore,
    cache: QueryCache,
    executor: Arc<RemoteExecutor>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Collection<R> {
    /// Reader on page 1 with the resource's default page size.
    pub fn new(cache: QueryCache, executor: Arc<RemoteExecutor>) -> Self {
        Self::with_filter(cache, executor, FilterStore::new(R::DEFAULT_PAGE_SIZE))
    }

    pub fn with_filter(cache: QueryCache, executor: Arc<RemoteExecutor>, filters: FilterStore) -> Self {
        Self {
            filters,
            cache,
            executor,
            _resource: PhantomData,
        }
    }

    pub fn filter(&self) -> &Filter {
        self.filters.filter()
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filters.set_filter(patch);
    }

    pub fn set_page(&mut self, page: u32) {
        self.filters.set_page(page);
    }

    /// Cache key of the current filter.
    pub fn key(&self) -> FetchKey {
        FetchKey::derive(R::NAMESPACE, self.filters.filter())
    }

    pub fn status(&self) -> FetchStatus {
        self.cache.status(&self.key())
    }

    // == Load ==
    /// Reads the current page, from cache when fresh, and projects it.
    pub async fn load(&self) -> Result<CollectionView<R::Row>> {
        let key = self.key();
        let executor = Arc::clone(&self.executor);
        let filter = self.filters.filter().clone();

        let cached = self
            .cache
            .fetch(&key, move || async move {
                executor.fetch_page::<R>(&filter).await
            })
            .await?;

        Ok(CollectionView::project::<R>(&cached.data, cached.source))
    }
}
