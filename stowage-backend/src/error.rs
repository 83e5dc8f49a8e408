//! Error types for store operations.

use crate::compressor::CompressionError;
use crate::encoding::EncodingError;
use crate::format::FormatError;
use thiserror::Error;

/// Error type for store operations.
///
/// Proxies never translate an inner error: whatever a terminal adapter
/// reports reaches the caller unchanged. Absence of a value is not an error
/// and is reported as `None` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Internal store error, state or computation error.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Serialization or deserialization error.
    #[error(transparent)]
    FormatError(#[from] FormatError),

    /// Compression or decompression error.
    #[error(transparent)]
    CompressionError(#[from] CompressionError),

    /// Text-safe encoding or key step error.
    #[error(transparent)]
    EncodingError(#[from] EncodingError),

    /// `increment` found a stored value that is not a counter.
    #[error("cannot increment a value of kind `{0}`")]
    NotAnInteger(&'static str),

    /// The adapter cannot address an entry with this key.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::InternalError(Box::new(error))
    }
}
