//! Fluent construction of [`Cache`] pairs.
//!
//! ```ignore
//! use stowage_backend::Compose;
//!
//! let store = memory.compose(file);
//! ```

use super::Cache;
use crate::Store;

/// Trait for composing stores into a cache hierarchy.
///
/// Automatically implemented for every sized [`Store`]; `self` becomes the
/// cache layer and the argument becomes the backend.
pub trait Compose: Store + Sized {
    /// Compose this store with `backend`, checked when this one misses.
    fn compose<B>(self, backend: B) -> Cache<Self, B>
    where
        B: Store,
    {
        Cache::new(self, backend)
    }
}

// Blanket implementation for all Store types
impl<T: Store> Compose for T {}
