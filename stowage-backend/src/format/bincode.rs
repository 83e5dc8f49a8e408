use bytes::Bytes;
use stowage_core::{Raw, Value};

use super::{Format, FormatError, FormatTypeId};

/// Bincode format (default)
///
/// Uses bincode's standard configuration (variable-length integers,
/// little endian). Trailing bytes after a decoded value are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFormat;

impl Format for BincodeFormat {
    fn serialize(&self, value: &Value) -> Result<Raw, FormatError> {
        ::bincode::serde::encode_to_vec(value, ::bincode::config::standard())
            .map(Bytes::from)
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<Value, FormatError> {
        let (value, read) =
            ::bincode::serde::decode_from_slice::<Value, _>(data, ::bincode::config::standard())
                .map_err(|error| FormatError::Deserialize(Box::new(error)))?;
        if read != data.len() {
            return Err(FormatError::Deserialize(Box::new(std::io::Error::other(
                format!("{} trailing bytes after bincode value", data.len() - read),
            ))));
        }
        Ok(value)
    }

    fn format_type_id(&self) -> FormatTypeId {
        FormatTypeId::Bincode
    }
}
