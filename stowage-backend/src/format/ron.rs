use bytes::Bytes;
use stowage_core::{Raw, Value};

use super::{Format, FormatError, FormatTypeId};

/// RON (Rusty Object Notation) format - human-readable alternative to JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct RonFormat;

impl Format for RonFormat {
    fn serialize(&self, value: &Value) -> Result<Raw, FormatError> {
        // RON serializer writes to a String, unlike JSON which writes bytes
        ::ron::to_string(value)
            .map(|text| Bytes::from(text.into_bytes()))
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<Value, FormatError> {
        let text =
            std::str::from_utf8(data).map_err(|error| FormatError::Deserialize(Box::new(error)))?;
        ::ron::from_str(text).map_err(|error| FormatError::Deserialize(Box::new(error)))
    }

    fn format_type_id(&self) -> FormatTypeId {
        FormatTypeId::Ron
    }
}
