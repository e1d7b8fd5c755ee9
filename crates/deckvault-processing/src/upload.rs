//! Async entry points for the upload path.
//!
//! Decoding and encoding are CPU-bound; both run on the blocking pool so a large
//! image never stalls other tasks on the runtime.

use bytes::Bytes;
use deckvault_core::UploadOptions;

use crate::error::ProcessingError;
use crate::image::{ImageTransformer, ProcessedAsset};

/// Upload-side image processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetProcessor;

impl AssetProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Run `ImageTransformer::transform` off the async pool.
    pub async fn transform(
        &self,
        data: Bytes,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<ProcessedAsset, ProcessingError> {
        let content_type = content_type.to_string();
        let options = options.clone();
        tokio::task::spawn_blocking(move || {
            ImageTransformer::transform(data, &content_type, &options)
        })
        .await
        .map_err(|e| ProcessingError::Task(e.to_string()))?
    }

    /// Run `ImageTransformer::thumbnail` off the async pool.
    pub async fn thumbnail(&self, data: Bytes) -> Result<ProcessedAsset, ProcessingError> {
        tokio::task::spawn_blocking(move || ImageTransformer::thumbnail(&data))
            .await
            .map_err(|e| ProcessingError::Task(e.to_string()))?
    }
}
