//! Mock Storage implementation for testing

use async_trait::async_trait;
use bytes::Bytes;
use deckvault_core::{FileMetadata, PutOutcome};
use deckvault_storage::{Storage, StorageError, StorageProvider, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock storage implementation that stores objects in memory
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, (Bytes, String)>>>,
    backend_type: StorageProvider,
    /// Puts whose key ends with this suffix fail
    fail_suffix: Option<String>,
    puts: Arc<Mutex<Vec<String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            backend_type: StorageProvider::Local,
            fail_suffix: None,
            puts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every put whose key ends with `suffix` fail with `UploadFailed`
    pub fn failing_on(suffix: &str) -> Self {
        Self {
            fail_suffix: Some(suffix.to_string()),
            ..Self::new()
        }
    }

    /// Check if an object exists in the mock storage
    pub fn has_file(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Get object data and content type (for test assertions)
    pub fn get_file(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Keys passed to `put`, in call order, including failed ones
    pub fn put_calls(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    fn url(key: &str) -> String {
        format!("https://example.com/{}", key)
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        make_public: bool,
    ) -> StorageResult<PutOutcome> {
        self.puts.lock().unwrap().push(storage_key.to_string());
        if let Some(suffix) = &self.fail_suffix {
            if storage_key.ends_with(suffix.as_str()) {
                return Err(StorageError::UploadFailed(format!(
                    "injected failure for {}",
                    storage_key
                )));
            }
        }
        self.objects
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), (data, content_type.to_string()));
        Ok(PutOutcome {
            url: format!("https://example.com/signed/{}", storage_key),
            public_url: make_public.then(|| Self::url(storage_key)),
        })
    }

    async fn read_url(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String> {
        Ok(format!(
            "https://example.com/signed/{}?expires={}",
            storage_key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.has_file(storage_key))
    }

    async fn stat(&self, storage_key: &str) -> StorageResult<Option<FileMetadata>> {
        Ok(self
            .get_file(storage_key)
            .map(|(data, content_type)| FileMetadata {
                size: data.len() as u64,
                last_modified: None,
                mime_type: content_type,
            }))
    }

    fn backend_type(&self) -> StorageProvider {
        self.backend_type
    }
}
