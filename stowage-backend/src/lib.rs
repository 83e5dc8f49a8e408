// #![warn(missing_docs)]
//! Store contract and the composition machinery built on top of it.
//!
//! If you want to implement your own storage adapter, you are in the right
//! place: implement [`Store`] and every proxy, transformer and cache in the
//! stowage family can sit on top of it.
mod compressor;
pub mod composition;
mod encoding;
mod error;
pub mod format;
mod key;
pub mod pipeline;
mod proxy;
mod store;
mod transformer;

pub use composition::{Cache, Compose};
#[cfg(feature = "gzip")]
pub use compressor::{GzipCompressor, ZlibCompressor};
#[cfg(feature = "zstd")]
pub use compressor::ZstdCompressor;
pub use compressor::{CompressionError, Compressor};
pub use encoding::{EncodingError, TextEncoding};
pub use error::StoreError;
pub use key::{escape, spread};
pub use pipeline::{Pipeline, PipelineError, Step, StepKind};
pub use proxy::Proxy;
pub use store::{BoxStore, Store, StoreExt, StoreResult};
pub use transformer::{Transformer, TransformerConfig};

pub use stowage_core::{Expiry, Key, Options, Raw, StoreLabel, Value};
