//! Ordered transform pipelines for keys and values.
//!
//! A [`Pipeline`] is compiled once from a list of [`Step`] names and applied
//! on every call. Forward application runs the steps in configured order;
//! reverse application undoes the reversible steps in reverse order.
//!
//! ```ignore
//! use stowage_backend::{Pipeline, Step};
//!
//! let keys = Pipeline::keys(&[Step::Json, Step::Sha256], Some("ns:"))?;
//! // json -> prefix -> sha256
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use stowage_core::Value;
use thiserror::Error;

use crate::{
    Compressor, EncodingError, StoreError, TextEncoding,
    format::{BincodeFormat, Format, JsonFormat, RonFormat},
    key,
};

/// Named transform step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[serde(alias = "marshal")]
    Bincode,
    Json,
    Ron,
    Zlib,
    Gzip,
    Zstd,
    Base64,
    Hex,
    Prefix,
    Escape,
    Sha256,
    Spread,
}

/// What a step does to its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Structured value to bytes.
    Serialize,
    /// Bytes to fewer bytes.
    Compress,
    /// Bytes to text-safe bytes.
    Encode,
    /// One-way key shaping.
    Key,
}

impl Step {
    pub const ALL: [Step; 12] = [
        Step::Bincode,
        Step::Json,
        Step::Ron,
        Step::Zlib,
        Step::Gzip,
        Step::Zstd,
        Step::Base64,
        Step::Hex,
        Step::Prefix,
        Step::Escape,
        Step::Sha256,
        Step::Spread,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::Bincode => "bincode",
            Step::Json => "json",
            Step::Ron => "ron",
            Step::Zlib => "zlib",
            Step::Gzip => "gzip",
            Step::Zstd => "zstd",
            Step::Base64 => "base64",
            Step::Hex => "hex",
            Step::Prefix => "prefix",
            Step::Escape => "escape",
            Step::Sha256 => "sha256",
            Step::Spread => "spread",
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Step::Bincode | Step::Json | Step::Ron => StepKind::Serialize,
            Step::Zlib | Step::Gzip | Step::Zstd => StepKind::Compress,
            Step::Base64 | Step::Hex => StepKind::Encode,
            Step::Prefix | Step::Escape | Step::Sha256 | Step::Spread => StepKind::Key,
        }
    }

    pub fn is_reversible(&self) -> bool {
        self.kind() != StepKind::Key
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Step {
    type Err = PipelineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "marshal" {
            return Ok(Step::Bincode);
        }
        Step::ALL
            .into_iter()
            .find(|step| step.name() == name)
            .ok_or_else(|| PipelineError::UnknownStep(name.to_owned()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("unknown transform step `{0}`")]
    UnknownStep(String),

    /// The step needs a cargo feature that is not enabled.
    #[error("transform step `{step}` requires the `{feature}` feature")]
    Unavailable { step: Step, feature: &'static str },

    /// A one-way step was placed in a value pipeline.
    #[error("transform step `{0}` is irreversible and cannot be applied to values")]
    Irreversible(Step),
}

enum Stage {
    Raw,
    Format(Box<dyn Format>),
    Compress(Box<dyn Compressor>),
    Encode(TextEncoding),
    Prefix(Option<String>),
    Escape,
    Sha256,
    Spread,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Raw => f.write_str("Raw"),
            Stage::Format(format) => write!(f, "Format({:?})", format.format_type_id()),
            Stage::Compress(compressor) => write!(f, "Compress({compressor:?})"),
            Stage::Encode(encoding) => write!(f, "Encode({encoding:?})"),
            Stage::Prefix(prefix) => write!(f, "Prefix({prefix:?})"),
            Stage::Escape => f.write_str("Escape"),
            Stage::Sha256 => f.write_str("Sha256"),
            Stage::Spread => f.write_str("Spread"),
        }
    }
}

impl Stage {
    fn compile(step: Step, prefix: Option<&str>) -> Result<Self, PipelineError> {
        Ok(match step {
            Step::Bincode => Stage::Format(Box::new(BincodeFormat)),
            Step::Json => Stage::Format(Box::new(JsonFormat)),
            Step::Ron => Stage::Format(Box::new(RonFormat)),
            #[cfg(feature = "gzip")]
            Step::Zlib => Stage::Compress(Box::new(crate::ZlibCompressor::default())),
            #[cfg(feature = "gzip")]
            Step::Gzip => Stage::Compress(Box::new(crate::GzipCompressor::default())),
            #[cfg(not(feature = "gzip"))]
            Step::Zlib | Step::Gzip => {
                return Err(PipelineError::Unavailable {
                    step,
                    feature: "gzip",
                });
            }
            #[cfg(feature = "zstd")]
            Step::Zstd => Stage::Compress(Box::new(crate::ZstdCompressor::default())),
            #[cfg(not(feature = "zstd"))]
            Step::Zstd => {
                return Err(PipelineError::Unavailable {
                    step,
                    feature: "zstd",
                });
            }
            Step::Base64 => Stage::Encode(TextEncoding::Base64),
            Step::Hex => Stage::Encode(TextEncoding::Hex),
            Step::Prefix => Stage::Prefix(prefix.map(str::to_owned)),
            Step::Escape => Stage::Escape,
            Step::Sha256 => Stage::Sha256,
            Step::Spread => Stage::Spread,
        })
    }

    fn forward(&self, value: Value) -> Result<Value, StoreError> {
        Ok(match self {
            Stage::Raw => Value::from(raw::tag(&value)?),
            Stage::Format(format) => Value::Bytes(format.serialize(&value)?),
            Stage::Compress(compressor) => {
                Value::from(compressor.compress(bytes_of(&value)?)?)
            }
            Stage::Encode(encoding) => Value::Text(encoding.encode(bytes_of(&value)?)),
            Stage::Prefix(None) => value,
            Stage::Prefix(Some(prefix)) => key::prefix(prefix, value)?,
            Stage::Escape => key::escape_key(&value)?,
            Stage::Sha256 => key::sha256_key(&value)?,
            Stage::Spread => key::spread_key(&value)?,
        })
    }

    fn reverse(&self, value: Value) -> Result<Value, StoreError> {
        Ok(match self {
            Stage::Raw => raw::untag(bytes_of(&value)?)?,
            Stage::Format(format) => format.deserialize(bytes_of(&value)?)?,
            Stage::Compress(compressor) => {
                Value::from(compressor.decompress(bytes_of(&value)?)?)
            }
            Stage::Encode(encoding) => Value::from(encoding.decode(bytes_of(&value)?)?),
            // one-way stages are never undone
            Stage::Prefix(_) | Stage::Escape | Stage::Sha256 | Stage::Spread => value,
        })
    }
}

/// Representation tagging for value pipelines that start with a byte-level
/// step. Text and bytes share the same byte form, so the variant is stored in
/// a leading tag byte to come back unchanged.
mod raw {
    use stowage_core::Value;

    use crate::EncodingError;

    const TEXT: u8 = b't';
    const BYTES: u8 = b'b';

    pub(super) fn tag(value: &Value) -> Result<Vec<u8>, EncodingError> {
        let (tag, data) = match value {
            Value::Text(text) => (TEXT, text.as_bytes()),
            Value::Bytes(bytes) => (BYTES, &bytes[..]),
            other => return Err(EncodingError::Unsupported(other.kind())),
        };
        let mut tagged = Vec::with_capacity(data.len() + 1);
        tagged.push(tag);
        tagged.extend_from_slice(data);
        Ok(tagged)
    }

    pub(super) fn untag(data: &[u8]) -> Result<Value, EncodingError> {
        match data.split_first() {
            Some((&TEXT, rest)) => Ok(Value::Text(String::from_utf8(rest.to_vec())?)),
            Some((&BYTES, rest)) => Ok(Value::from(rest.to_vec())),
            Some((other, _)) => Err(EncodingError::UnknownTag(Some(*other))),
            None => Err(EncodingError::UnknownTag(None)),
        }
    }
}

fn bytes_of(value: &Value) -> Result<&[u8], EncodingError> {
    value
        .as_bytes()
        .ok_or_else(|| EncodingError::Unsupported(value.kind()))
}

/// Compiled sequence of transform steps.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Compiles a key pipeline.
    ///
    /// When `prefix` is set and `steps` has no explicit [`Step::Prefix`], the
    /// prefix is inserted before the first irreversible step, or appended if
    /// there is none. An explicit `prefix` step without a prefix is a no-op.
    pub fn keys(steps: &[Step], prefix: Option<&str>) -> Result<Self, PipelineError> {
        let mut steps = steps.to_vec();
        if prefix.is_some() && !steps.contains(&Step::Prefix) {
            let at = steps
                .iter()
                .position(|step| !step.is_reversible())
                .unwrap_or(steps.len());
            steps.insert(at, Step::Prefix);
        }
        Self::compile(steps, prefix)
    }

    /// Compiles a value pipeline. Every step must be reversible.
    ///
    /// A pipeline that starts with a compress or encode step only accepts
    /// text and bytes, and tags which of the two it was given so that
    /// [`reverse`](Self::reverse) returns the same variant.
    pub fn values(steps: &[Step]) -> Result<Self, PipelineError> {
        if let Some(step) = steps.iter().find(|step| !step.is_reversible()) {
            return Err(PipelineError::Irreversible(*step));
        }
        let mut pipeline = Self::compile(steps.to_vec(), None)?;
        if steps
            .first()
            .is_some_and(|step| step.kind() != StepKind::Serialize)
        {
            pipeline.stages.insert(0, Stage::Raw);
        }
        Ok(pipeline)
    }

    fn compile(steps: Vec<Step>, prefix: Option<&str>) -> Result<Self, PipelineError> {
        let stages = steps
            .iter()
            .map(|step| Stage::compile(*step, prefix))
            .collect::<Result<_, _>>()?;
        Ok(Self { steps, stages })
    }

    /// The effective steps, including an inserted prefix.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Applies every step in configured order.
    pub fn forward(&self, value: Value) -> Result<Value, StoreError> {
        self.stages
            .iter()
            .try_fold(value, |value, stage| stage.forward(value))
    }

    /// Undoes the reversible steps in reverse order.
    pub fn reverse(&self, value: Value) -> Result<Value, StoreError> {
        self.stages
            .iter()
            .rev()
            .try_fold(value, |value, stage| stage.reverse(value))
    }
}
