//! Two-tier store that combines a fast cache with a slower backend.
//!
//! # Read Strategy
//! 1. Check the cache → Hit: return value
//! 2. Check the backend → Hit: populate the cache, return value
//! 3. Miss: return `None`
//!
//! # Write Strategy
//! - Write-through: the cache is written first, then the backend
//! - Not atomic: if the backend write fails the cache keeps the new value
//!
//! # Counters
//! `increment` drops the cached entry and increments the backend only, so
//! the cache never holds a stale counter.
//!
//! # Example
//! ```ignore
//! use stowage_backend::{Cache, Compose};
//! use stowage_memory::MemoryStore;
//! use stowage_file::FileStore;
//!
//! let cache = Cache::new(MemoryStore::new(), FileStore::open(dir).await?);
//! // or, fluently
//! let cache = MemoryStore::new().compose(FileStore::open(dir).await?);
//! ```

mod compose;

pub use compose::Compose;

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use stowage_core::{Key, Options, StoreLabel, Value};

use crate::{BoxStore, Store, StoreResult};

/// A store that composes two stores into a read-through, write-through pair.
///
/// Owns both stores exclusively; closing the cache closes both, once.
/// Labelled `<cache>.<backend>` unless [`with_label`](Self::with_label)
/// says otherwise.
#[derive(Debug)]
pub struct Cache<C = BoxStore, B = BoxStore> {
    /// Fast layer, checked first on reads.
    cache: C,
    /// Authoritative layer.
    backend: B,
    label: StoreLabel,
    closed: AtomicBool,
}

impl<C: Store, B: Store> Cache<C, B> {
    pub fn new(cache: C, backend: B) -> Self {
        let label = cache.label().compose(&backend.label());
        Self {
            cache,
            backend,
            label,
            closed: AtomicBool::new(false),
        }
    }

    /// Sets the label reported by this cache.
    pub fn with_label(mut self, label: impl Into<StoreLabel>) -> Self {
        self.label = label.into();
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_parts(self) -> (C, B) {
        (self.cache, self.backend)
    }
}

#[async_trait]
impl<C: Store, B: Store> Store for Cache<C, B> {
    #[tracing::instrument(skip(self, options), level = "trace")]
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        if self.cache.contains(key, options).await? {
            return Ok(true);
        }
        self.backend.contains(key, options).await
    }

    #[tracing::instrument(skip(self, options), level = "trace")]
    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        if let Some(value) = self.cache.load(key, options).await? {
            tracing::trace!("cache hit");
            return Ok(Some(value));
        }
        match self.backend.load(key, options).await? {
            Some(value) => {
                tracing::trace!("backend hit, refilling cache");
                self.cache.store(key, value.clone(), options).await?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, value, options), level = "trace")]
    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        self.cache.store(key, value.clone(), options).await?;
        self.backend.store(key, value, options).await
    }

    #[tracing::instrument(skip(self, options), level = "trace")]
    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let cached = self.cache.delete(key, options).await?;
        let stored = self.backend.delete(key, options).await?;
        Ok(cached.or(stored))
    }

    #[tracing::instrument(skip(self, options), level = "trace")]
    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        self.cache.delete(key, options).await?;
        self.backend.increment(key, amount, options).await
    }

    #[tracing::instrument(skip(self, options), level = "trace")]
    async fn clear(&self, options: &Options) -> StoreResult<()> {
        self.cache.clear(options).await?;
        self.backend.clear(options).await
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let cache = self.cache.close().await;
        let backend = self.backend.close().await;
        match (cache, backend) {
            (Err(error), backend) => {
                if let Err(second) = backend {
                    tracing::warn!(error = ?second, label = %self.label, "backend close failed");
                }
                Err(error)
            }
            (Ok(()), backend) => backend,
        }
    }

    fn label(&self) -> StoreLabel {
        self.label.clone()
    }
}
