//! Time-to-live support for stores without native expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stowage_backend::{BoxStore, Proxy, Store, StoreResult};
use stowage_core::{Expiry, Key, Options, StoreLabel, Value};

/// Configuration for [`Expires`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiresConfig {
    /// Default time to live in seconds. Absent or `0` means entries never
    /// expire unless a call asks for it.
    pub expires: Option<u64>,
}

impl ExpiresConfig {
    pub fn default_expiry(&self) -> Expiry {
        Expiry::from_secs(self.expires.unwrap_or(0))
    }
}

enum Record {
    Live(Value),
    Expired,
    /// Not written by this layer; counters stored by `increment` end up here.
    Raw(Value),
}

/// Proxy that adds expiration to any store.
///
/// Each value is persisted as a two-element list
/// `[payload, expires_at_millis | null]`. Expired entries are deleted lazily,
/// when a read finds them; no timers run in the background.
///
/// ```ignore
/// use std::time::Duration;
/// use stowage::Expires;
/// use stowage_core::{Expiry, Options};
///
/// let store = Expires::new(memory, Expiry::After(Duration::from_secs(60)));
/// store.store(&key, value, &Options::default().never_expire()).await?;
/// ```
#[derive(Debug)]
pub struct Expires<S = BoxStore> {
    inner: Proxy<S>,
    default: Expiry,
}

impl<S: Store> Expires<S> {
    pub fn new(inner: S, default: Expiry) -> Self {
        Self {
            inner: Proxy::new(inner),
            default,
        }
    }

    fn wrap(&self, value: Value, options: &Options) -> Value {
        let expiry = options.expires.unwrap_or(self.default);
        let deadline = expiry
            .deadline(Utc::now())
            .map(|at| Value::Integer(at.timestamp_millis()))
            .unwrap_or(Value::Null);
        Value::List(vec![value, deadline])
    }

    fn unwrap(value: Value, now: DateTime<Utc>) -> Record {
        let mut items = match value {
            Value::List(items) => items,
            other => return Record::Raw(other),
        };
        let deadline = match items.as_slice() {
            [_, Value::Null] => None,
            [_, Value::Integer(at)] => Some(*at),
            _ => return Record::Raw(Value::List(items)),
        };
        match deadline {
            Some(at) if at <= now.timestamp_millis() => Record::Expired,
            _ => Record::Live(items.swap_remove(0)),
        }
    }
}

#[async_trait]
impl<S: Store> Store for Expires<S> {
    async fn contains(&self, key: &Key, options: &Options) -> StoreResult<bool> {
        Ok(self.load(key, options).await?.is_some())
    }

    async fn load(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let Some(value) = self.inner.load(key, options).await? else {
            return Ok(None);
        };
        match Self::unwrap(value, Utc::now()) {
            Record::Live(payload) | Record::Raw(payload) => Ok(Some(payload)),
            Record::Expired => {
                tracing::trace!(?key, "reaping expired entry");
                self.inner.delete(key, options).await?;
                Ok(None)
            }
        }
    }

    async fn store(&self, key: &Key, value: Value, options: &Options) -> StoreResult<Value> {
        let wrapped = self.wrap(value.clone(), options);
        self.inner.store(key, wrapped, options).await?;
        Ok(value)
    }

    async fn delete(&self, key: &Key, options: &Options) -> StoreResult<Option<Value>> {
        let Some(value) = self.inner.delete(key, options).await? else {
            return Ok(None);
        };
        match Self::unwrap(value, Utc::now()) {
            Record::Live(payload) | Record::Raw(payload) => Ok(Some(payload)),
            Record::Expired => Ok(None),
        }
    }

    async fn increment(&self, key: &Key, amount: i64, options: &Options) -> StoreResult<i64> {
        self.inner.increment(key, amount, options).await
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unwrap_distinguishes_records() {
        let now = Utc::now();
        let past = Value::Integer(now.timestamp_millis() - 1);
        let future = Value::Integer(now.timestamp_millis() + 60_000);

        assert!(matches!(
            Expires::<BoxStore>::unwrap(Value::List(vec![Value::from("a"), Value::Null]), now),
            Record::Live(_)
        ));
        assert!(matches!(
            Expires::<BoxStore>::unwrap(Value::List(vec![Value::from("a"), future]), now),
            Record::Live(_)
        ));
        assert!(matches!(
            Expires::<BoxStore>::unwrap(Value::List(vec![Value::from("a"), past]), now),
            Record::Expired
        ));
        assert!(matches!(
            Expires::<BoxStore>::unwrap(Value::Integer(3), now),
            Record::Raw(Value::Integer(3))
        ));
    }

    #[test]
    fn config_defaults_to_never() {
        assert_eq!(ExpiresConfig::default().default_expiry(), Expiry::Never);
        assert_eq!(
            ExpiresConfig { expires: Some(5) }.default_expiry(),
            Expiry::After(Duration::from_secs(5))
        );
    }
}
