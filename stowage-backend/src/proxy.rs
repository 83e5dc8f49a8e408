//! Generic delegating wrapper.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use stowage_core::{Key, Options, StoreLabel, Value};

use crate::{BoxStore, Store, StoreResult};

/// A store that forwards every operation to exactly one inner store.
///
/// Arguments and results pass through unchanged. Concrete proxies own a
/// `Proxy` and call into it for the operations they do not intercept, which
/// also gives them the close-once guarantee for free: the first `close`
/// reaches the inner store, later calls return `Ok(())` without delegating.
///
/// ```ignore
/// use stowage_backend::{Proxy, StoreExt};
///
/// let proxy = Proxy::new(inner);
/// proxy.set("a", 1).await?;
/// ```
#[derive(Debug)]
pub struct Proxy<S = BoxStore> {
    inner: S,
    closed: AtomicBool,
}

impl<S: Store> Proxy<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the proxy.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Returns `true` once `close` has been propagated.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<S: Store> Store for Proxy<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        self.inner.contains(key, options).await
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        self.inner.load(key, options).await
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        self.inner.store(key, value, options).await
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        self.inner.delete(key, options).await
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        self.inner.increment(key, amount, options).await
    }

    async fn clear(&self, options: &Options) -> StoreResult<()> {
        self.inner.clear(options).await
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.inner.close().await
    }

    fn label(&self) -> StoreLabel {
        self.inner.label()
    }
}
