//! Text-safe encodings for adapters that cannot hold arbitrary bytes.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// A key step received a value it cannot turn into bytes.
    #[error("cannot encode a value of kind `{0}`")]
    Unsupported(&'static str),

    /// Stored raw value does not start with a known representation tag.
    #[error("unknown raw value tag {0:?}")]
    UnknownTag(Option<u8>),

    #[error("raw text value is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Reversible bytes-to-text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Base64,
    Hex,
}

impl TextEncoding {
    pub fn encode(&self, data: &[u8]) -> String {
        match self {
            TextEncoding::Base64 => STANDARD.encode(data),
            TextEncoding::Hex => hex::encode(data),
        }
    }

    pub fn decode(&self, text: &[u8]) -> Result<Vec<u8>, EncodingError> {
        Ok(match self {
            TextEncoding::Base64 => STANDARD.decode(text)?,
            TextEncoding::Hex => hex::decode(text)?,
        })
    }
}
