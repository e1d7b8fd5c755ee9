#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageError, StorageResult};
use deckvault_core::config::BackendConfig;
use deckvault_core::StorageConfig;
use std::sync::Arc;

/// Create the storage backend selected by configuration
///
/// The provider is resolved exactly once here; callers only ever see `dyn Storage`.
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    config
        .validate()
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    match &config.backend {
        #[cfg(feature = "storage-s3")]
        BackendConfig::S3(s3) => {
            let storage = S3Storage::new(s3, config.signed_url_ttl, config.io_timeout).await?;
            tracing::info!(bucket = %s3.bucket, region = %s3.region, "Using S3 storage backend");
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        BackendConfig::S3(_) => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        BackendConfig::Local(local) => {
            let storage = LocalStorage::new(
                local.root_path.clone(),
                local.base_url.clone(),
                config.io_timeout,
            )
            .await?;
            tracing::info!(
                path = %local.root_path.display(),
                base_url = %local.base_url,
                "Using local storage backend"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        BackendConfig::Local(_) => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
