#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Stack assembly: [`Builder`], [`CacheBlock`] and the one-shot helpers.
pub mod builder;

/// Error type for stack declaration and construction.
pub mod error;

/// Time-to-live proxy for stores without native expiry.
pub mod expires;

/// Mutual exclusion proxy.
pub mod lock;

/// Structured logging proxy.
pub mod logger;

/// Name-to-component registry used by the builder.
pub mod registry;

pub use builder::{Builder, CacheBlock, build, build_with};
pub use error::ConfigError;
pub use expires::{Expires, ExpiresConfig};
pub use lock::Lock;
pub use logger::{LogLevel, Logger, LoggerConfig};
pub use registry::{AdapterKind, ProxyKind};

pub use stowage_backend::{
    BoxStore, Cache, Compose, Pipeline, PipelineError, Proxy, Step, Store, StoreError, StoreExt,
    StoreResult, Transformer, TransformerConfig,
};
pub use stowage_core::{Expiry, Key, Options, StoreLabel, Value};

#[cfg(feature = "file")]
pub use stowage_file::{FileConfig, FileStore};
#[cfg(feature = "memory")]
pub use stowage_memory::{MemoryConfig, MemoryStore, NullStore};

/// Build-time option mapping each component deserializes its configuration from.
pub type Settings = serde_json::Map<String, serde_json::Value>;
