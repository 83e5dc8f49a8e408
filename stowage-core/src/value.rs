//! Dynamically typed values stored and addressed by a store stack.
//!
//! Every layer of a stack exchanges [`Value`]s. Callers hand in structured
//! values, encoding layers turn them into [`Value::Bytes`] or [`Value::Text`]
//! on the way down and back on the way up, and terminal adapters persist
//! whatever reaches them.
//!
//! Keys use the same model (see [`Key`]), so a terminal adapter can index any
//! value it receives. Equality and hashing are total: floats compare by their
//! bit pattern, which makes `NaN` equal to itself and keeps `0.0` and `-0.0`
//! apart.
//!
//! ```
//! use stowage_core::Value;
//!
//! let value = Value::from("hello");
//! assert_eq!(value.as_text(), Some("hello"));
//! assert_eq!(value.as_bytes(), Some(&b"hello"[..]));
//!
//! let counter = Value::from(41);
//! assert_eq!(counter.as_integer(), Some(41));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::Raw;

/// Keys are ordinary values.
///
/// Encoding layers re-derive the physical key from the caller's key on every
/// call, so any value that hashes deterministically can address an entry.
pub type Key = Value;

/// A value stored in, or used to address, a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Value {
    /// Explicit null. Distinct from an absent entry.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer. Counters maintained by `increment` use this variant.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes, usually the output of a serialization step.
    Bytes(Raw),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed map with deterministic ordering.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns a short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Returns the underlying bytes of a [`Value::Bytes`] or [`Value::Text`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            Value::Text(text) => Some(text.as_bytes()),
            _ => None,
        }
    }

    /// Returns the text of a [`Value::Text`], or of a [`Value::Bytes`]
    /// holding valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Returns the integer held by a [`Value::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Interprets the value as a counter.
    ///
    /// Integers are returned as-is; text and bytes are parsed as a decimal
    /// number so counters written by byte-oriented adapters can be read back.
    pub fn to_counter(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) | Value::Bytes(_) => self.as_text()?.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Integer(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(text) => text.hash(state),
            Value::Bytes(bytes) => bytes.hash(state),
            Value::List(items) => items.hash(state),
            Value::Map(map) => map.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(text) => write!(f, "{text:?}"),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::List(items) => write!(f, "<list of {}>", items.len()),
            Value::Map(map) => write!(f, "<map of {}>", map.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Raw> for Value {
    fn from(value: Raw) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Raw::from(value))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(Raw::copy_from_slice(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn values_of_different_kinds_never_collide() {
        let mut set = HashSet::new();
        set.insert(Value::from("1"));
        set.insert(Value::from(1));
        set.insert(Value::from(&b"1"[..]));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn counters_parse_from_text_and_bytes() {
        assert_eq!(Value::from(" 12 ").to_counter(), Some(12));
        assert_eq!(Value::from(b"-3".to_vec()).to_counter(), Some(-3));
        assert_eq!(Value::from(true).to_counter(), None);
    }

    #[test]
    fn serde_roundtrip_preserves_variant() {
        let value: Value = vec![
            Value::from("a"),
            Value::from(b"a".to_vec()),
            Value::Null,
        ]
        .into();
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
