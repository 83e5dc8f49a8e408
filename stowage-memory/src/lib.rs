#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod null;
mod store;

pub use builder::{MemoryConfig, MemoryStoreBuilder};
pub use null::NullStore;
pub use store::MemoryStore;
