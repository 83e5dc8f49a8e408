//! Byte-level compression steps.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("compression failed: {0}")]
    Compress(Box<dyn std::error::Error + Send + Sync>),

    #[error("decompression failed: {0}")]
    Decompress(Box<dyn std::error::Error + Send + Sync>),
}

/// Reversible byte transform applied after serialization.
pub trait Compressor: std::fmt::Debug + Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

#[cfg(feature = "gzip")]
mod deflate {
    use std::io::{Read, Write};

    use flate2::{
        Compression,
        read::{GzDecoder, ZlibDecoder},
        write::{GzEncoder, ZlibEncoder},
    };

    use super::{CompressionError, Compressor};

    /// Zlib (RFC 1950) stream compression.
    #[derive(Debug, Clone, Copy)]
    pub struct ZlibCompressor {
        level: u32,
    }

    impl ZlibCompressor {
        /// Creates a compressor with a specific level, clamped to `0..=9`.
        pub fn with_level(level: u32) -> Self {
            Self {
                level: level.min(9),
            }
        }
    }

    impl Default for ZlibCompressor {
        fn default() -> Self {
            Self { level: 6 }
        }
    }

    impl Compressor for ZlibCompressor {
        fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
            encoder
                .write_all(data)
                .map_err(|e| CompressionError::Compress(Box::new(e)))?;
            encoder
                .finish()
                .map_err(|e| CompressionError::Compress(Box::new(e)))
        }

        fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
            let mut decoder = ZlibDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| CompressionError::Decompress(Box::new(e)))?;
            Ok(out)
        }
    }

    /// Gzip (RFC 1952) compression.
    #[derive(Debug, Clone, Copy)]
    pub struct GzipCompressor {
        level: u32,
    }

    impl GzipCompressor {
        pub fn with_level(level: u32) -> Self {
            Self {
                level: level.min(9),
            }
        }
    }

    impl Default for GzipCompressor {
        fn default() -> Self {
            Self { level: 6 }
        }
    }

    impl Compressor for GzipCompressor {
        fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level));
            encoder
                .write_all(data)
                .map_err(|e| CompressionError::Compress(Box::new(e)))?;
            encoder
                .finish()
                .map_err(|e| CompressionError::Compress(Box::new(e)))
        }

        fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
            let mut decoder = GzDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| CompressionError::Decompress(Box::new(e)))?;
            Ok(out)
        }
    }
}

#[cfg(feature = "gzip")]
pub use deflate::{GzipCompressor, ZlibCompressor};

/// Zstandard compression.
#[cfg(feature = "zstd")]
#[derive(Debug, Clone, Copy)]
pub struct ZstdCompressor {
    level: i32,
}

#[cfg(feature = "zstd")]
impl ZstdCompressor {
    pub fn with_level(level: i32) -> Self {
        Self { level }
    }
}

#[cfg(feature = "zstd")]
impl Default for ZstdCompressor {
    fn default() -> Self {
        Self { level: 3 }
    }
}

#[cfg(feature = "zstd")]
impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        zstd::encode_all(data, self.level).map_err(|e| CompressionError::Compress(Box::new(e)))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        zstd::decode_all(data).map_err(|e| CompressionError::Decompress(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &[u8] = b"stowage stowage stowage stowage stowage stowage";

    #[cfg(feature = "gzip")]
    #[test]
    fn zlib_shrinks_repetitive_input() {
        let zlib = ZlibCompressor::default();
        let compressed = zlib.compress(PAYLOAD).unwrap();
        assert!(compressed.len() < PAYLOAD.len());
        assert_eq!(zlib.decompress(&compressed).unwrap(), PAYLOAD);
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn gzip_rejects_foreign_bytes() {
        let result = GzipCompressor::default().decompress(b"not gzip");
        assert!(matches!(result, Err(CompressionError::Decompress(_))));
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_restores_input() {
        let zstd = ZstdCompressor::default();
        let compressed = zstd.compress(PAYLOAD).unwrap();
        assert_eq!(zstd.decompress(&compressed).unwrap(), PAYLOAD);
    }
}
