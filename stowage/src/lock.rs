//! Mutual exclusion for stores that are not safe to share.

use async_trait::async_trait;
use stowage_backend::{BoxStore, Proxy, Store, StoreResult};
use stowage_core::{Key, Options, StoreLabel, Value};
use tokio::sync::Mutex;

/// Proxy that lets exactly one operation at a time reach the inner store.
///
/// The guard is held for the single delegated call and released on every
/// exit path, including errors and cancelled futures.
#[derive(Debug)]
pub struct Lock<S = BoxStore> {
    inner: Proxy<S>,
    lock: Mutex<()>,
}

impl<S: Store> Lock<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Proxy::new(inner),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<S: Store> Store for Lock<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        self.inner.contains(key, options).await
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        self.inner.load(key, options).await
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        let _guard = self.lock.lock().await;
        self.inner.store(key, value, options).await
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        self.inner.delete(key, options).await
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        let _guard = self.lock.lock().await;
        self.inner.increment(key, amount, options).await
    }

    async fn clear(&self, options: &Options) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.inner.clear(options).await
    }

    async fn close(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.inner.close().await
    }

    fn label(&self) -> StoreLabel {
        self.inner.label()
    }
}
