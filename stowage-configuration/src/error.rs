use thiserror::Error;

/// Failure to read a [`StoreConfig`](crate::StoreConfig) document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid YAML store configuration: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("invalid JSON store configuration: {0}")]
    Json(#[from] serde_json::Error),
}
