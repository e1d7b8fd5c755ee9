use crate::assets::input::UploadInput;
use crate::error::AssetError;
use bytes::Bytes;
use deckvault_core::{FileMetadata, StorageConfig, UploadOptions, UploadResult};
use deckvault_processing::{AssetProcessor, ImageProcessor, UploadValidator};
use deckvault_storage::{create_storage, keys, Storage};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upload orchestrator
///
/// Sequences validation, transformation, key generation, the main `put` and the
/// optional thumbnail `put`. Holds no per-call state, so clones share the backend
/// and concurrent uploads need no coordination. Nothing is retried here.
#[derive(Clone)]
pub struct AssetStorage {
    config: Arc<StorageConfig>,
    storage: Arc<dyn Storage>,
    processor: AssetProcessor,
}

impl AssetStorage {
    /// Validate `config` and build the backend it selects
    pub async fn new(config: StorageConfig) -> Result<Self, AssetError> {
        config.validate()?;
        let storage = create_storage(&config).await?;
        Ok(Self::with_storage(config, storage))
    }

    /// Use an already constructed backend
    pub fn with_storage(config: StorageConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            processor: AssetProcessor::new(),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Store an asset, transforming images per `options`
    ///
    /// A failure before the main object is written leaves the store untouched. A
    /// thumbnail failure after it is written yields `AssetError::PartialUpload`
    /// carrying the stored main object; it is not rolled back.
    #[tracing::instrument(skip(self, input, options))]
    pub async fn upload(
        &self,
        input: impl Into<UploadInput>,
        filename: &str,
        content_type: Option<&str>,
        options: &UploadOptions,
    ) -> Result<UploadResult, AssetError> {
        let start = Instant::now();

        let data = input.into().into_bytes().await?;
        let content_type = UploadValidator::validate_all(filename, content_type, data.len())?;
        let key = keys::generate_key(filename, options.folder.as_deref())?;

        let processed = self
            .processor
            .transform(data.clone(), &content_type, options)
            .await?;

        let size = processed.data.len() as u64;
        let outcome = self
            .storage
            .put(
                &key,
                processed.data,
                &processed.mime_type,
                options.make_public,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Failed to store asset");
                AssetError::from(e)
            })?;

        let mut result = UploadResult {
            key,
            url: outcome.url,
            public_url: outcome.public_url,
            thumbnail_key: None,
            thumbnail_url: None,
            size,
            mime_type: processed.mime_type,
            width: processed.width,
            height: processed.height,
        };

        if options.generate_thumbnail && ImageProcessor::is_decodable(&content_type) {
            match self
                .store_thumbnail(&result.key, data, options.make_public)
                .await
            {
                Ok((thumbnail_key, thumbnail_url)) => {
                    result.thumbnail_key = Some(thumbnail_key);
                    result.thumbnail_url = Some(thumbnail_url);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        key = %result.key,
                        "Main object stored but thumbnail failed"
                    );
                    return Err(AssetError::PartialUpload {
                        result: Box::new(result),
                        source: Box::new(e),
                    });
                }
            }
        }

        tracing::info!(
            key = %result.key,
            mime_type = %result.mime_type,
            size_bytes = result.size,
            thumbnail = result.thumbnail_key.is_some(),
            public = result.public_url.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset uploaded"
        );

        Ok(result)
    }

    /// Thumbnail is always derived from the original bytes, not the transformed ones
    async fn store_thumbnail(
        &self,
        main_key: &str,
        original: Bytes,
        make_public: bool,
    ) -> Result<(String, String), AssetError> {
        let thumbnail = self.processor.thumbnail(original).await?;
        let thumbnail_key = keys::derive_thumbnail_key(main_key);
        let outcome = self
            .storage
            .put(
                &thumbnail_key,
                thumbnail.data,
                &thumbnail.mime_type,
                make_public,
            )
            .await?;
        Ok((thumbnail_key, outcome.url))
    }

    /// Access URL for `key`; `expires_in` defaults to the configured signed URL lifetime
    pub async fn read_url(
        &self,
        key: &str,
        expires_in: Option<Duration>,
    ) -> Result<String, AssetError> {
        let expires_in = expires_in.unwrap_or(self.config.signed_url_ttl);
        Ok(self.storage.read_url(key, expires_in).await?)
    }

    /// Delete `key`; a missing key is not an error
    pub async fn delete(&self, key: &str) -> Result<(), AssetError> {
        self.storage.delete(key).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to delete asset");
            AssetError::from(e)
        })?;
        tracing::info!(key = %key, "Asset deleted");
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, AssetError> {
        Ok(self.storage.exists(key).await?)
    }

    /// Metadata for `key`, `None` when absent
    pub async fn stat(&self, key: &str) -> Result<Option<FileMetadata>, AssetError> {
        Ok(self.storage.stat(key).await?)
    }

    /// The key a thumbnail of `key` is stored under
    pub fn derive_thumbnail_key(&self, key: &str) -> String {
        keys::derive_thumbnail_key(key)
    }
}
