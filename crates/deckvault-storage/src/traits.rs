//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use deckvault_core::{FileMetadata, PutOutcome, StorageProvider};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Storage operation timed out after {timeout:?}: {operation}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Configuration problems are fatal; everything else is the backend being unavailable.
    pub fn is_configuration(&self) -> bool {
        matches!(self, StorageError::ConfigError(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait, so the
/// orchestrator works with `Arc<dyn Storage>` and never branches on the provider.
///
/// Missing objects are not errors: `delete` succeeds, `exists` returns `false`
/// and `stat` returns `None`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write an object under `storage_key`.
    ///
    /// Returns the access URL (signed and time-limited where the backend supports it)
    /// and, only when `make_public` is set, a stable public URL.
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        make_public: bool,
    ) -> StorageResult<PutOutcome>;

    /// Produce a fresh access URL for an existing key
    async fn read_url(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Delete an object; deleting a missing key is a no-op
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists without transferring its body
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Size, modification time and MIME type, or `None` when the key is absent
    async fn stat(&self, storage_key: &str) -> StorageResult<Option<FileMetadata>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageProvider;
}
