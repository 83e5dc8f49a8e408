//! Simple in-memory test store implementation using DashMap.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use dashmap::DashMap;
use stowage_backend::{Key, Options, Store, StoreError, StoreLabel, StoreResult, Value};

/// Simple in-memory store for testing using DashMap.
///
/// Clones share the same map, so a test can keep a handle for inspection
/// after moving the store into a stack.
#[derive(Clone, Default)]
pub struct TestStore {
    entries: Arc<DashMap<Key, Value>>,
    closes: Arc<AtomicUsize>,
    fail_close: bool,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `close` always fails.
    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Self::default()
        }
    }

    /// Raw entry as the store holds it.
    pub fn get_raw(&self, key: &Key) -> Option<Value> {
        self.entries.get(key).map(|v| v.clone())
    }

    pub fn insert_raw(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn wipe(&self) {
        self.entries.clear();
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for TestStore {
    async fn load(&self, key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        Ok(self.get_raw(key))
    }

    async fn store(&self, key: &Key, value: Value, _options: &Options) -> StoreResult<Value> {
        self.entries.insert(key.clone(), value.clone());
        Ok(value)
    }

    async fn delete(&self, key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        Ok(self.entries.remove(key).map(|(_, v)| v))
    }

    async fn increment(&self, key: &Key, amount: i64, _options: &Options) -> StoreResult<i64> {
        let mut entry = self.entries.entry(key.clone()).or_insert(Value::Integer(0));
        let current = entry
            .to_counter()
            .ok_or(StoreError::NotAnInteger(entry.kind()))?;
        let next = current + amount;
        *entry = Value::Integer(next);
        Ok(next)
    }

    async fn clear(&self, _options: &Options) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(StoreError::InternalError("close failed".into()));
        }
        Ok(())
    }

    fn label(&self) -> StoreLabel {
        StoreLabel::new_static("test")
    }
}
