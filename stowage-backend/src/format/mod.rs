//! Value serialization formats.
//!
//! A [`Format`] turns a structured [`Value`] into bytes and back. It is the
//! reversible first step of most value pipelines and, for adapters that need
//! string or binary keys, of key pipelines as well.
//!
//! | Format | Output | Notes |
//! |--------|--------|-------|
//! | [`BincodeFormat`] | Compact binary | Default serializer |
//! | [`JsonFormat`] | UTF-8 JSON | Human-readable |
//! | [`RonFormat`] | UTF-8 RON | Human-readable, Rust syntax |

use stowage_core::{Raw, Value};
use thiserror::Error;

mod bincode;
mod json;
mod ron;

pub use bincode::BincodeFormat;
pub use json::JsonFormat;
pub use ron::RonFormat;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// Unique identifier for format types, used to compare format equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTypeId {
    Json,
    Bincode,
    Ron,
}

/// Object-safe serialization format.
///
/// Implementations must be deterministic: serializing the same value twice
/// yields the same bytes, so serialized keys address the same entry on
/// every call.
pub trait Format: std::fmt::Debug + Send + Sync {
    /// Serializes `value` into bytes.
    fn serialize(&self, value: &Value) -> Result<Raw, FormatError>;

    /// Restores a value previously produced by [`Format::serialize`].
    fn deserialize(&self, data: &[u8]) -> Result<Value, FormatError>;

    /// Returns a unique identifier for this format type.
    fn format_type_id(&self) -> FormatTypeId;
}

impl Format for Box<dyn Format> {
    fn serialize(&self, value: &Value) -> Result<Raw, FormatError> {
        (**self).serialize(value)
    }

    fn deserialize(&self, data: &[u8]) -> Result<Value, FormatError> {
        (**self).deserialize(data)
    }

    fn format_type_id(&self) -> FormatTypeId {
        (**self).format_type_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> Value {
        let mut map = BTreeMap::new();
        map.insert("name".to_owned(), Value::from("stowage"));
        map.insert("count".to_owned(), Value::from(3));
        map.insert("ratio".to_owned(), Value::from(0.5));
        map.insert("raw".to_owned(), Value::from(vec![0u8, 159, 255]));
        map.insert(
            "tags".to_owned(),
            Value::List(vec![Value::Null, Value::Bool(true)]),
        );
        Value::Map(map)
    }

    fn formats() -> Vec<Box<dyn Format>> {
        vec![
            Box::new(BincodeFormat),
            Box::new(JsonFormat),
            Box::new(RonFormat),
        ]
    }

    #[test]
    fn every_format_restores_the_value() {
        let value = sample();
        for format in formats() {
            let bytes = format.serialize(&value).unwrap();
            let back = format.deserialize(&bytes).unwrap();
            assert_eq!(back, value, "{:?}", format.format_type_id());
        }
    }

    #[test]
    fn serialization_is_deterministic() {
        let value = sample();
        for format in formats() {
            assert_eq!(
                format.serialize(&value).unwrap(),
                format.serialize(&value).unwrap()
            );
        }
    }

    #[test]
    fn garbage_is_a_deserialize_error() {
        for format in formats() {
            let result = format.deserialize(&[0xff, 0xfe, 0xfd]);
            assert!(matches!(result, Err(FormatError::Deserialize(_))));
        }
    }
}
