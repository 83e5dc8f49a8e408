use stowage_backend::StoreError;
use thiserror::Error;

/// Errors that can occur when opening a [`FileStore`](crate::FileStore).
#[derive(Debug, Error)]
pub enum FileError {
    /// An I/O error occurred while preparing the root directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The provided configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<FileError> for StoreError {
    fn from(error: FileError) -> Self {
        match error {
            FileError::Io(error) => StoreError::InternalError(Box::new(error)),
            other => StoreError::InternalError(Box::new(other)),
        }
    }
}
