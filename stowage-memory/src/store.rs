//! Moka-backed in-memory store.

use async_trait::async_trait;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use stowage_backend::{Store, StoreError, StoreResult};
use stowage_core::{Key, Options, StoreLabel, Value};

use crate::builder::MemoryStoreBuilder;

/// In-memory store powered by Moka.
///
/// Values are kept as-is, without serialization, so any [`Value`] round-trips
/// exactly. Counters are updated atomically through Moka's entry compute API.
///
/// # Examples
///
/// ```
/// use stowage_memory::MemoryStore;
///
/// let unbounded = MemoryStore::new();
/// let bounded = MemoryStore::builder().max_entries(10_000).build();
/// ```
///
/// # Caveats
///
/// - Data is **not persisted** and is lost when the store is dropped
/// - With `max_entries` set, least recently used entries are evicted silently
#[derive(Clone)]
pub struct MemoryStore {
    pub(crate) cache: Cache<Key, Value>,
    pub(crate) label: StoreLabel,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("label", &self.label)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Returns the underlying Moka cache.
    pub fn cache(&self) -> &Cache<Key, Value> {
        &self.cache
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn contains(&self, key: &Key, _options: &Options) -> StoreResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn load(&self, key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        Ok(self.cache.get(key).await)
    }

    async fn store(&self, key: &Key, value: Value, _options: &Options) -> StoreResult<Value> {
        self.cache.insert(key.clone(), value.clone()).await;
        Ok(value)
    }

    async fn delete(&self, key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        Ok(self.cache.remove(key).await)
    }

    async fn increment(&self, key: &Key, amount: i64, _options: &Options) -> StoreResult<i64> {
        let result = self
            .cache
            .entry(key.clone())
            .and_try_compute_with(|entry| async move {
                let current = match entry {
                    None => 0,
                    Some(entry) => {
                        let value = entry.into_value();
                        value
                            .to_counter()
                            .ok_or(StoreError::NotAnInteger(value.kind()))?
                    }
                };
                let next = current
                    .checked_add(amount)
                    .ok_or_else(|| StoreError::InternalError("counter overflow".into()))?;
                Ok::<_, StoreError>(Op::Put(Value::Integer(next)))
            })
            .await?;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => entry
                .into_value()
                .as_integer()
                .ok_or(StoreError::NotAnInteger("unknown")),
            _ => Err(StoreError::InternalError(
                "counter update was not applied".into(),
            )),
        }
    }

    async fn clear(&self, _options: &Options) -> StoreResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        tracing::trace!(label = %self.label, "closing memory store");
        Ok(())
    }

    fn label(&self) -> StoreLabel {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_backend::StoreExt;

    #[tokio::test]
    async fn absent_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.remove("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn increment_parses_textual_counters() {
        let store = MemoryStore::new();
        store.set("n", "41").await.unwrap();
        assert_eq!(store.incr("n", 1).await.unwrap(), 42);
        assert_eq!(store.get("n").await.unwrap(), Some(Value::Integer(42)));
    }

    #[tokio::test]
    async fn increment_rejects_structured_values() {
        let store = MemoryStore::new();
        store.set("n", vec![Value::Null]).await.unwrap();
        assert!(matches!(
            store.incr("n", 1).await,
            Err(StoreError::NotAnInteger("list"))
        ));
    }
}
