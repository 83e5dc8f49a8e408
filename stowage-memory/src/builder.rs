//! Builder for configuring [`MemoryStore`].

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use stowage_core::StoreLabel;

use crate::store::MemoryStore;

/// Serde configuration for the `Memory` adapter.
///
/// ```yaml
/// max_entries: 10000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Upper bound on the number of entries; unbounded when absent.
    pub max_entries: Option<u64>,
}

impl MemoryConfig {
    pub fn into_store(self) -> MemoryStore {
        let builder = MemoryStore::builder();
        match self.max_entries {
            Some(n) => builder.max_entries(n).build(),
            None => builder.build(),
        }
    }
}

/// Builder for creating and configuring a [`MemoryStore`].
///
/// Use [`MemoryStore::builder`] to create a new builder instance.
///
/// ```
/// use stowage_memory::MemoryStore;
///
/// let store = MemoryStore::builder()
///     .max_entries(1_000)
///     .label("sessions")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStoreBuilder {
    max_entries: Option<u64>,
    label: StoreLabel,
}

impl Default for MemoryStoreBuilder {
    fn default() -> Self {
        Self {
            max_entries: None,
            label: StoreLabel::new_static("memory"),
        }
    }
}

impl MemoryStoreBuilder {
    /// Limits the store to `n` entries, evicting least recently used ones.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = Some(n);
        self
    }

    /// Sets a custom label for this store.
    pub fn label(mut self, label: impl Into<StoreLabel>) -> Self {
        self.label = label.into();
        self
    }

    pub fn build(self) -> MemoryStore {
        let mut builder = Cache::builder();
        if let Some(n) = self.max_entries {
            builder = builder.max_capacity(n);
        }
        MemoryStore {
            cache: builder.build(),
            label: self.label,
        }
    }
}
