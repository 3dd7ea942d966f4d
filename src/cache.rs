//! Version catalog caching.
//!
//! [`CatalogCache`] is an LRU map from project name to its fetched catalog,
//! gated behind the `cache` feature and backed by the [`lru`] crate.
//! [`CachingRepository`] wraps any [`DocsRepository`] with it so that
//! switching back and forth between projects does not refetch.
//!
//! Failed fetches are never cached. [`CacheStats`] tracks hits, misses and
//! invalidations.
//!
//! # Examples
//!
//! ```
//! use docat_navigator::cache::CatalogCache;
//! use docat_navigator::VersionDescriptor;
//!
//! let mut cache = CatalogCache::new();
//! cache.insert("awesome", vec![VersionDescriptor::new("1.0.0")]);
//!
//! assert_eq!(cache.get("awesome").unwrap().len(), 1);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::config::SyncConfig;
use crate::error::RepositoryError;
use crate::location::Location;
use crate::logging::docs_log;
use crate::repository::DocsRepository;
use crate::version::VersionDescriptor;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to fetch.
    pub misses: usize,
    /// Number of invalidations (single project or full clear).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of version catalogs keyed by project.
#[derive(Debug)]
pub struct CatalogCache {
    entries: LruCache<String, Vec<VersionDescriptor>>,
    stats: CacheStats,
}

impl CatalogCache {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` catalogs (minimum one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the catalog of `project`. Updates hit/miss stats.
    pub fn get(&mut self, project: &str) -> Option<Vec<VersionDescriptor>> {
        if let Some(catalog) = self.entries.get(project) {
            self.stats.hits += 1;
            docs_log!(trace, "Catalog cache hit for '{}'", project);
            Some(catalog.clone())
        } else {
            self.stats.misses += 1;
            docs_log!(trace, "Catalog cache miss for '{}'", project);
            None
        }
    }

    /// Store the catalog of `project`, evicting the least recently used.
    pub fn insert(&mut self, project: impl Into<String>, catalog: Vec<VersionDescriptor>) {
        self.entries.push(project.into(), catalog);
    }

    /// Forget the catalog of `project`.
    pub fn invalidate(&mut self, project: &str) {
        if self.entries.pop(project).is_some() {
            self.stats.invalidations += 1;
            docs_log!(debug, "Catalog of '{}' invalidated", project);
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        docs_log!(
            debug,
            "Catalog cache cleared: {} entries removed (hit rate: {:.1}%)",
            len,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached catalogs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`DocsRepository`] that memoizes catalogs of another one.
pub struct CachingRepository<R> {
    inner: R,
    cache: Mutex<CatalogCache>,
}

impl<R: DocsRepository> CachingRepository<R> {
    /// Wrap `inner` with a cache of `capacity` catalogs.
    pub fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(CatalogCache::with_capacity(capacity)),
        }
    }

    /// Wrap `inner` with a cache sized by `config.catalog_cache_capacity`.
    pub fn from_config(inner: R, config: &SyncConfig) -> Self {
        Self::new(inner, config.catalog_cache_capacity)
    }

    /// The wrapped repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache
            .lock()
            .map(|cache| cache.stats().clone())
            .unwrap_or_default()
    }

    /// Forget the cached catalog of `project`.
    pub fn invalidate(&self, project: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.invalidate(project);
        }
    }

    fn cached(&self, project: &str) -> Option<Vec<VersionDescriptor>> {
        self.cache.lock().ok()?.get(project)
    }
}

#[async_trait]
impl<R: DocsRepository> DocsRepository for CachingRepository<R> {
    async fn get_versions(
        &self,
        project: &str,
    ) -> Result<Vec<VersionDescriptor>, RepositoryError> {
        if let Some(catalog) = self.cached(project) {
            return Ok(catalog);
        }

        let catalog = self.inner.get_versions(project).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(project, catalog.clone());
        }
        Ok(catalog)
    }

    fn docs_url(&self, location: &Location) -> String {
        self.inner.docs_url(location)
    }
}
