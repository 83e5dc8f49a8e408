use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use stowage_core::{Key, Options, StoreLabel, Value};

use crate::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// The key-value contract every layer of a stack implements.
///
/// Terminal adapters talk to real storage, proxies wrap exactly one inner
/// store and the cache composite owns two. Callers cannot tell them apart.
///
/// Absence is reported as `Ok(None)`; only genuine failures are errors.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns `true` if `key` has a value.
    ///
    /// The default implementation loads the value and checks for presence.
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        Ok(self.load(key, options).await?.is_some())
    }

    /// Loads the value stored under `key`.
    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>>;

    /// Stores `value` under `key` and returns it.
    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value>;

    /// Deletes `key` and returns the value it held.
    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>>;

    /// Atomically adds `amount` to the counter under `key` and returns the
    /// new value. A missing counter starts at zero.
    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64>;

    /// Removes every entry.
    async fn clear(&self, options: &Options) -> StoreResult<()>;

    /// Releases the resources held by this store and everything it owns.
    ///
    /// No operation is valid afterwards.
    async fn close(&self) -> StoreResult<()>;

    /// Returns the label of this store for logs and composed names.
    fn label(&self) -> StoreLabel {
        StoreLabel::new_static("store")
    }
}

pub type BoxStore = Box<dyn Store>;

#[async_trait]
impl<S: Store + ?Sized> Store for Box<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        (**self).contains(key, options).await
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        (**self).load(key, options).await
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        (**self).store(key, value, options).await
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        (**self).delete(key, options).await
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        (**self).increment(key, amount, options).await
    }

    async fn clear(&self, options: &Options) -> StoreResult<()> {
        (**self).clear(options).await
    }

    async fn close(&self) -> StoreResult<()> {
        (**self).close().await
    }

    fn label(&self) -> StoreLabel {
        (**self).label()
    }
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        (**self).contains(key, options).await
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        (**self).load(key, options).await
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        (**self).store(key, value, options).await
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        (**self).delete(key, options).await
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        (**self).increment(key, amount, options).await
    }

    async fn clear(&self, options: &Options) -> StoreResult<()> {
        (**self).clear(options).await
    }

    async fn close(&self) -> StoreResult<()> {
        (**self).close().await
    }

    fn label(&self) -> StoreLabel {
        (**self).label()
    }
}

/// Shorthand operations using default [`Options`].
///
/// Implemented for every [`Store`], including trait objects.
///
/// ```ignore
/// use stowage_backend::StoreExt;
///
/// store.set("a", 1).await?;
/// assert_eq!(store.get("a").await?, Some(Value::from(1)));
/// ```
pub trait StoreExt: Store {
    fn get(&self, key: impl Into<Key>) -> impl Future<Output = StoreResult<Option<Value>>> + Send {
        let key = key.into();
        async move { self.load(&key, &Options::default()).await }
    }

    fn set(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> impl Future<Output = StoreResult<Value>> + Send {
        let (key, value) = (key.into(), value.into());
        async move { self.store(&key, value, &Options::default()).await }
    }

    fn has(&self, key: impl Into<Key>) -> impl Future<Output = StoreResult<bool>> + Send {
        let key = key.into();
        async move { self.contains(&key, &Options::default()).await }
    }

    fn remove(&self, key: impl Into<Key>) -> impl Future<Output = StoreResult<Option<Value>>> + Send {
        let key = key.into();
        async move { self.delete(&key, &Options::default()).await }
    }

    fn incr(&self, key: impl Into<Key>, amount: i64) -> impl Future<Output = StoreResult<i64>> + Send {
        let key = key.into();
        async move { self.increment(&key, amount, &Options::default()).await }
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
