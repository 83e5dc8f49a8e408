//! Structured logging of store operations.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stowage_backend::{BoxStore, Proxy, Store, StoreResult};
use stowage_core::{Key, Options, StoreLabel, Value};

/// Level at which successful operations are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
}

/// Configuration for [`Logger`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    /// Added to every event as the `prefix` field.
    pub prefix: Option<String>,
}

macro_rules! event_at {
    ($level:expr, $($field:tt)+) => {
        match $level {
            LogLevel::Trace => tracing::trace!($($field)+),
            LogLevel::Debug => tracing::debug!($($field)+),
            LogLevel::Info => tracing::info!($($field)+),
        }
    };
}

/// Pass-through proxy that emits one `tracing` event per operation.
///
/// Successful calls are logged at the configured level with the operation
/// name, key and outcome. Failures are logged at `warn` and returned
/// unchanged.
#[derive(Debug)]
pub struct Logger<S = BoxStore> {
    inner: Proxy<S>,
    level: LogLevel,
    prefix: String,
}

impl<S: Store> Logger<S> {
    pub fn new(inner: S, config: LoggerConfig) -> Self {
        Self {
            inner: Proxy::new(inner),
            level: config.level,
            prefix: config.prefix.unwrap_or_default(),
        }
    }

    fn report<T: Debug>(&self, op: &'static str, key: Option<&Key>, result: &StoreResult<T>) {
        let store = self.inner.label();
        match result {
            Ok(outcome) => event_at!(
                self.level,
                store = %store,
                prefix = %self.prefix,
                op,
                key = ?key,
                outcome = ?outcome,
                "store operation"
            ),
            Err(error) => tracing::warn!(
                store = %store,
                prefix = %self.prefix,
                op,
                key = ?key,
                error = %error,
                "store operation failed"
            ),
        }
    }
}

#[async_trait]
impl<S: Store> Store for Logger<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        let result = self.inner.contains(key, options).await;
        self.report("contains", Some(key), &result);
        result
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let result = self.inner.load(key, options).await;
        self.report("load", Some(key), &result);
        result
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        let result = self.inner.store(key, value, options).await;
        self.report("store", Some(key), &result);
        result
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let result = self.inner.delete(key, options).await;
        self.report("delete", Some(key), &result);
        result
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        let result = self.inner.increment(key, amount, options).await;
        self.report("increment", Some(key), &result);
        result
    }

    async fn clear(&self, options: &Options) -> StoreResult<()> {
        let result = self.inner.clear(options).await;
        self.report("clear", None, &result);
        result
    }

    async fn close(&self) -> StoreResult<()> {
        let result = self.inner.close().await;
        self.report("close", None, &result);
        result
    }

    fn label(&self) -> StoreLabel {
        self.inner.label()
    }
}
