//! Irreversible key steps.
//!
//! These steps shape physical keys for adapters with addressing constraints
//! (file names, directory fan-out, length limits). They are one-way: a lookup
//! re-derives the physical key from the caller's key instead of decoding it.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use sha2::{Digest, Sha256};
use stowage_core::Value;

use crate::EncodingError;

/// Everything except `[A-Za-z0-9_-]` is escaped.
const FILE_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

fn bytes_of(key: &Value) -> Result<&[u8], EncodingError> {
    key.as_bytes()
        .ok_or_else(|| EncodingError::Unsupported(key.kind()))
}

/// Prepends `prefix` to a text or binary key.
pub(crate) fn prefix(prefix: &str, key: Value) -> Result<Value, EncodingError> {
    match key {
        Value::Text(text) => Ok(Value::Text(format!("{prefix}{text}"))),
        Value::Bytes(bytes) => {
            let mut out = Vec::with_capacity(prefix.len() + bytes.len());
            out.extend_from_slice(prefix.as_bytes());
            out.extend_from_slice(&bytes);
            Ok(Value::from(out))
        }
        other => Err(EncodingError::Unsupported(other.kind())),
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`.
///
/// The result is a single path component: it never contains `/`, `.` or
/// anything else a filesystem would interpret.
pub fn escape(data: &[u8]) -> String {
    percent_encode(data, FILE_SAFE).to_string()
}

pub(crate) fn escape_key(key: &Value) -> Result<Value, EncodingError> {
    Ok(Value::Text(escape(bytes_of(key)?)))
}

/// Lowercase hex SHA-256 digest of the key bytes.
pub(crate) fn sha256_key(key: &Value) -> Result<Value, EncodingError> {
    let digest = Sha256::digest(bytes_of(key)?);
    Ok(Value::Text(hex::encode(digest)))
}

/// Splits a key into a two-character directory and the remainder,
/// `"ab12cd"` becomes `"ab/12cd"`. Keys of two characters or fewer are
/// returned unchanged.
pub fn spread(key: &str) -> String {
    match key.char_indices().nth(2) {
        Some((split, _)) => format!("{}/{}", &key[..split], &key[split..]),
        None => key.to_owned(),
    }
}

pub(crate) fn spread_key(key: &Value) -> Result<Value, EncodingError> {
    let text = std::str::from_utf8(bytes_of(key)?)
        .map_err(|_| EncodingError::Unsupported(key.kind()))?;
    Ok(Value::Text(spread(text)))
}
