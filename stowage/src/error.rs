use stowage_backend::{PipelineError, StoreError};
use thiserror::Error;

/// Errors raised while declaring or building a store stack.
///
/// Every variant is a build-time failure; a stack that built successfully
/// only ever reports [`StoreError`] from its operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Builder options must be a key/value mapping.
    #[error("builder options must be a mapping, got {0}")]
    OptionsNotMapping(&'static str),

    /// The configuration function declared nothing.
    #[error("no components declared")]
    NoDeclarations,

    /// No proxy or adapter is registered under this name.
    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    /// The adapter exists but is not compiled into this build.
    #[error("backend `{0}` is not available; enable the corresponding cargo feature")]
    BackendNotAvailable(String),

    /// The innermost declaration is a proxy.
    #[error("the last declaration `{0}` is not an adapter")]
    MissingAdapter(String),

    /// An adapter was followed by further declarations.
    #[error("adapter `{adapter}` must be declared last, but `{next}` follows it")]
    AdapterNotLast { adapter: String, next: String },

    /// Merged settings did not match the component's configuration.
    #[error("invalid settings for `{component}`: {source}")]
    InvalidSettings {
        component: String,
        #[source]
        source: serde_json::Error,
    },

    /// A transform pipeline could not be compiled.
    #[error("invalid pipeline for `{component}`: {source}")]
    InvalidPipeline {
        component: String,
        #[source]
        source: PipelineError,
    },

    /// A cache slot was configured twice.
    #[error("cache slot `{0}` is already set")]
    SlotAlreadySet(&'static str),

    /// A cache slot was left empty.
    #[error("cache slot `{0}` is not set")]
    MissingSlot(&'static str),

    /// An adapter failed to open.
    #[error("adapter `{component}` failed to open: {source}")]
    Adapter {
        component: String,
        #[source]
        source: StoreError,
    },
}
