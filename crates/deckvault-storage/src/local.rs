use crate::keys::{encode_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageProvider;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use deckvault_core::mime::content_type_for_filename;
use deckvault_core::{FileMetadata, PutOutcome};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

/// Bytes read from the start of a file to detect its type
const SNIFF_LEN: usize = 8192;

/// Local filesystem storage implementation
///
/// URLs are a static join of the configured base URL and the key. Expiry is
/// meaningless here: local paths are not access-controlled by this crate.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    io_timeout: Duration,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/deckvault/uploads")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/uploads")
    /// * `io_timeout` - Upper bound on each filesystem call
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        io_timeout: Duration,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        // Resolved once so per-key containment checks compare canonical paths
        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to canonicalize storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            io_timeout,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory, including through
    /// symlinks already present under it.
    async fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);

        // Nearest existing ancestor, so keys that are not written yet are checked too
        for ancestor in path.ancestors() {
            if let Ok(canonical) = fs::canonicalize(ancestor).await {
                if !canonical.starts_with(&self.base_path) {
                    return Err(StorageError::InvalidKey(
                        "Storage key resolves outside storage directory".to_string(),
                    ));
                }
                break;
            }
        }

        Ok(path)
    }

    /// Generate URL for file
    fn generate_url(&self, storage_key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            encode_key(storage_key)
        )
    }

    /// Ensure parent directory exists. Safe to race: `create_dir_all` tolerates existing dirs.
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, fut: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        tokio::time::timeout(self.io_timeout, fut)
            .await
            .map_err(|_| StorageError::Timeout {
                operation,
                timeout: self.io_timeout,
            })?
    }

    /// Sibling temp file the object is written to before being renamed into place
    fn temp_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }

    /// Write `data` to `tmp`, then rename over `path`. Readers never observe a
    /// partially written object under a real key.
    async fn write_file(&self, path: &Path, tmp: &Path, data: &[u8]) -> StorageResult<()> {
        self.ensure_parent_dir(path).await?;

        let mut file = fs::File::create(tmp).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", tmp.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", tmp.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", tmp.display(), e))
        })?;
        drop(file);

        fs::rename(tmp, path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })
    }

    /// MIME type from the file's magic bytes, falling back to the key's extension
    async fn sniff_content_type(path: &Path, storage_key: &str) -> StorageResult<String> {
        let mut header = [0u8; SNIFF_LEN];
        let mut file = fs::File::open(path).await?;
        let mut filled = 0;
        while filled < header.len() {
            let n = file.read(&mut header[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        Ok(infer::get(&header[..filled])
            .map(|kind| kind.mime_type())
            .unwrap_or_else(|| content_type_for_filename(storage_key))
            .to_string())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
        make_public: bool,
    ) -> StorageResult<PutOutcome> {
        let path = self.key_to_path(storage_key).await?;
        let tmp = Self::temp_path(&path);
        let size = data.len();
        let start = std::time::Instant::now();

        if let Err(e) = self
            .with_timeout("put", self.write_file(&path, &tmp, &data))
            .await
        {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        error = %cleanup,
                        path = %tmp.display(),
                        "Failed to remove temporary upload file"
                    );
                }
            }
            return Err(e);
        }

        let url = self.generate_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            public = make_public,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(PutOutcome {
            public_url: make_public.then(|| url.clone()),
            url,
        })
    }

    async fn read_url(&self, storage_key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.key_to_path(storage_key).await?;
        Ok(self.generate_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key).await?;
        let start = std::time::Instant::now();

        let removed = self
            .with_timeout("delete", async {
                match fs::remove_file(&path).await {
                    Ok(()) => Ok(true),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                    Err(e) => Err(StorageError::DeleteFailed(format!(
                        "Failed to delete file {}: {}",
                        path.display(),
                        e
                    ))),
                }
            })
            .await?;

        if removed {
            tracing::info!(
                path = %path.display(),
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Local storage delete successful"
            );
        } else {
            tracing::debug!(
                key = %storage_key,
                "Local storage delete of missing key ignored"
            );
        }

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key).await?;
        self.with_timeout("exists", async {
            match fs::metadata(&path).await {
                Ok(meta) => Ok(meta.is_file()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(StorageError::IoError(e)),
            }
        })
        .await
    }

    async fn stat(&self, storage_key: &str) -> StorageResult<Option<FileMetadata>> {
        let path = self.key_to_path(storage_key).await?;
        let meta = self
            .with_timeout("stat", async {
                match fs::metadata(&path).await {
                    Ok(meta) if meta.is_file() => Ok(Some(meta)),
                    Ok(_) => Ok(None),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(StorageError::IoError(e)),
                }
            })
            .await?;

        let Some(meta) = meta else {
            return Ok(None);
        };
        let mime_type = self
            .with_timeout("stat", Self::sniff_content_type(&path, storage_key))
            .await?;

        Ok(Some(FileMetadata {
            size: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            mime_type,
        }))
    }

    fn backend_type(&self) -> StorageProvider {
        StorageProvider::Local
    }
}
