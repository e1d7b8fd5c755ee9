use deckvault_core::{ConfigError, UploadResult};
use deckvault_processing::{ProcessingError, ValidationError};
use deckvault_storage::StorageError;

/// Errors surfaced by `AssetStorage`
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Missing or invalid configuration; fatal, never retried
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rejected input: empty bytes, a filename without extension, an unsafe folder
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The image pipeline failed; nothing was written
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// The backend failed or timed out
    #[error("Storage backend unavailable: {0}")]
    Backend(StorageError),

    /// The main object is stored but the thumbnail is not
    #[error("Upload of {} stored without its thumbnail: {source}", .result.key)]
    PartialUpload {
        result: Box<UploadResult>,
        #[source]
        source: Box<AssetError>,
    },
}

impl AssetError {
    /// The stored main object of a partial upload
    pub fn partial_result(&self) -> Option<&UploadResult> {
        match self {
            AssetError::PartialUpload { result, .. } => Some(result),
            _ => None,
        }
    }
}

impl From<StorageError> for AssetError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(msg) => AssetError::Configuration(msg),
            StorageError::InvalidKey(msg) | StorageError::InvalidArgument(msg) => {
                AssetError::InvalidInput(msg)
            }
            other => AssetError::Backend(other),
        }
    }
}

impl From<ConfigError> for AssetError {
    fn from(err: ConfigError) -> Self {
        AssetError::Configuration(err.to_string())
    }
}

impl From<ValidationError> for AssetError {
    fn from(err: ValidationError) -> Self {
        AssetError::InvalidInput(err.to_string())
    }
}
