use bytes::Bytes;
use stowage_core::{Raw, Value};

use super::{Format, FormatError, FormatTypeId};

/// JSON format
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize(&self, value: &Value) -> Result<Raw, FormatError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<Value, FormatError> {
        serde_json::from_slice(data).map_err(|error| FormatError::Deserialize(Box::new(error)))
    }

    fn format_type_id(&self) -> FormatTypeId {
        FormatTypeId::Json
    }
}
