//! Key and value transformation proxy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stowage_core::{Key, Options, StoreLabel, Value};

use crate::{BoxStore, Pipeline, PipelineError, Proxy, Step, Store, StoreResult};

/// Configuration for [`Transformer`].
///
/// ```yaml
/// key: [bincode, sha256]
/// value: [json, zlib]
/// prefix: "users:"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Steps applied to every key, in order.
    pub key: Vec<Step>,
    /// Steps applied to every value, in order. Empty leaves values untouched.
    pub value: Vec<Step>,
    /// Namespace prepended to keys.
    pub prefix: Option<String>,
}

/// Proxy that rewrites keys and values on their way to the inner store.
///
/// Keys go through the key pipeline on every call. Values go through the
/// value pipeline on `store` and are restored on `load` and `delete`.
/// Counters written by `increment` are stored as raw integers and are
/// returned by `load` without decoding.
#[derive(Debug)]
pub struct Transformer<S = BoxStore> {
    inner: Proxy<S>,
    keys: Pipeline,
    values: Pipeline,
}

impl<S: Store> Transformer<S> {
    pub fn new(inner: S, config: &TransformerConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            inner: Proxy::new(inner),
            keys: Pipeline::keys(&config.key, config.prefix.as_deref())?,
            values: Pipeline::values(&config.value)?,
        })
    }

    pub fn key_pipeline(&self) -> &Pipeline {
        &self.keys
    }

    pub fn value_pipeline(&self) -> &Pipeline {
        &self.values
    }

    /// Derives the physical key the inner store sees for `key`.
    pub fn physical_key(&self, key: &Key) -> StoreResult<Key> {
        self.keys.forward(key.clone())
    }

    fn restore(&self, value: Option<Value>) -> StoreResult<Option<Value>> {
        match value {
            None => Ok(None),
            Some(counter @ Value::Integer(_)) if !self.values.is_empty() => Ok(Some(counter)),
            Some(value) => self.values.reverse(value).map(Some),
        }
    }
}

#[async_trait]
impl<S: Store> Store for Transformer<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        let key = self.physical_key(key)?;
        self.inner.contains(&key, options).await
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let key = self.physical_key(key)?;
        let value = self.inner.load(&key, options).await?;
        self.restore(value)
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        let physical = self.physical_key(key)?;
        let encoded = self.values.forward(value.clone())?;
        self.inner.store(&physical, encoded, options).await?;
        Ok(value)
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let key = self.physical_key(key)?;
        let value = self.inner.delete(&key, options).await?;
        self.restore(value)
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        let key = self.physical_key(key)?;
        self.inner.increment(&key, amount, options).await
    }

    async fn clear(&self, options: &Options) -> StoreResult<()> {
        self.inner.clear(options).await
    }

    async fn close(&self) -> StoreResult<()> {
        self.inner.close().await
    }

    fn label(&self) -> StoreLabel {
        self.inner.label()
    }
}
