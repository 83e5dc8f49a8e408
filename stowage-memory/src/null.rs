//! Store that holds nothing.

use async_trait::async_trait;
use stowage_backend::{Store, StoreResult};
use stowage_core::{Key, Options, StoreLabel, Value};

/// Discards every write and reports every key absent.
///
/// Useful as the backend of a stack under test, or to switch a cache off
/// without changing the code that talks to it. `increment` returns `amount`
/// as if every counter started from zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl Store for NullStore {
    async fn contains(&self, _key: &Key, _options: &Options) -> StoreResult<bool> {
        Ok(false)
    }

    async fn load(&self, _key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        Ok(None)
    }

    async fn store(&self, _key: &Key, value: Value, _options: &Options) -> StoreResult<Value> {
        Ok(value)
    }

    async fn delete(&self, _key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        Ok(None)
    }

    async fn increment(&self, _key: &Key, amount: i64, _options: &Options) -> StoreResult<i64> {
        Ok(amount)
    }

    async fn clear(&self, _options: &Options) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }

    fn label(&self) -> StoreLabel {
        StoreLabel::new_static("null")
    }
}
