use crate::keys::{encode_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageProvider;
use async_trait::async_trait;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::head_object::{HeadObjectError, HeadObjectOutput};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use deckvault_core::config::S3Config;
use deckvault_core::constants::{FALLBACK_CONTENT_TYPE, MAX_SIGNED_URL_TTL_SECS};
use deckvault_core::{FileMetadata, PutOutcome};
use std::time::Duration;

/// S3 storage implementation
///
/// Objects are written with a canned ACL (`public-read` or `private`). The access
/// URL returned by `put` is always a presigned GET; the stable public URL is only
/// handed out for public objects.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_domain: Option<String>,
    signed_url_ttl: Duration,
    io_timeout: Duration,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials come from the configuration only; the ambient AWS provider chain
    /// is never consulted, so a misconfigured process fails here rather than on the
    /// first upload.
    ///
    /// # Arguments
    /// * `config` - bucket, region, credentials and optional endpoint / public domain
    /// * `signed_url_ttl` - lifetime of the URL returned by `put`
    /// * `io_timeout` - per-operation timeout applied by the SDK
    pub async fn new(
        config: &S3Config,
        signed_url_ttl: Duration,
        io_timeout: Duration,
    ) -> StorageResult<Self> {
        if config.access_key_id.trim().is_empty() || config.secret_access_key.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set for S3 storage"
                    .to_string(),
            ));
        }
        check_presign_expiry(signed_url_ttl)
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        if config.bucket.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "S3_BUCKET not configured".to_string(),
            ));
        }

        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "deckvault-config",
        );

        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_retry_mode(RetryMode::Standard);

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(io_timeout)
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .load()
            .await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(ref endpoint) = config.endpoint {
            // Path-style addressing is required by MinIO and most S3-compatible providers
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }
        let client = Client::from_conf(s3_config_builder.build());

        Ok(S3Storage {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint_url: config.endpoint.clone(),
            public_domain: config.public_domain.clone(),
            signed_url_ttl,
            io_timeout,
        })
    }

    /// Generate the stable public URL for an object
    ///
    /// Uses the public distribution domain when configured. Otherwise falls back to
    /// the bucket URL: `https://{bucket}.s3.{region}.amazonaws.com/{key}` for AWS, or
    /// `{endpoint}/{bucket}/{key}` (path-style) for S3-compatible providers.
    pub fn public_url(&self, storage_key: &str) -> String {
        let key = encode_key(storage_key);
        if let Some(ref domain) = self.public_domain {
            let domain = domain.trim_end_matches('/');
            if domain.starts_with("http://") || domain.starts_with("https://") {
                format!("{}/{}", domain, key)
            } else {
                format!("https://{}/{}", domain, key)
            }
        } else if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    /// Canned ACL for an object: `public-read` only when the caller asked for it
    fn canned_acl(make_public: bool) -> ObjectCannedAcl {
        if make_public {
            ObjectCannedAcl::PublicRead
        } else {
            ObjectCannedAcl::Private
        }
    }

    /// The stable public URL is handed out only for public objects
    fn put_outcome(&self, storage_key: &str, signed_url: String, make_public: bool) -> PutOutcome {
        PutOutcome {
            url: signed_url,
            public_url: make_public.then(|| self.public_url(storage_key)),
        }
    }

    async fn presign_get(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String> {
        check_presign_expiry(expires_in)?;
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::InvalidArgument(e.to_string()))?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .presigned(presigning_config)
            .await
            .map_err(|e| self.sdk_error("presign", e))?;

        Ok(presigned_request.uri().to_string())
    }

    /// HEAD the object, mapping "not found" to `None`
    async fn head(&self, storage_key: &str) -> StorageResult<Option<HeadObjectOutput>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
        {
            Ok(output) => Ok(Some(output)),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                Ok(None)
            }
            Err(e) => Err(self.sdk_error("head", e)),
        }
    }

    fn sdk_error<E, R>(&self, operation: &'static str, err: SdkError<E, R>) -> StorageError
    where
        E: std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        match err {
            SdkError::TimeoutError(_) => StorageError::Timeout {
                operation,
                timeout: self.io_timeout,
            },
            other => StorageError::BackendError(format!(
                "S3 {} failed: {}",
                operation,
                DisplayErrorContext(&other)
            )),
        }
    }
}

/// SigV4 presigned URLs must expire within (0, one week]
fn check_presign_expiry(expires_in: Duration) -> StorageResult<()> {
    if expires_in.is_zero() || expires_in > Duration::from_secs(MAX_SIGNED_URL_TTL_SECS) {
        return Err(StorageError::InvalidArgument(format!(
            "presigned URL expiry must be between 1 and {} seconds, got {}",
            MAX_SIGNED_URL_TTL_SECS,
            expires_in.as_secs()
        )));
    }
    Ok(())
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        make_public: bool,
    ) -> StorageResult<PutOutcome> {
        validate_key(storage_key)?;
        let size = data.len() as u64;
        let body = ByteStream::from(data);

        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .body(body)
            .content_type(content_type)
            .acl(Self::canned_acl(make_public))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                match self.sdk_error("put", e) {
                    StorageError::BackendError(msg) => StorageError::UploadFailed(msg),
                    other => other,
                }
            })?;

        let url = self.presign_get(storage_key, self.signed_url_ttl).await?;
        let outcome = self.put_outcome(storage_key, url, make_public);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            public = make_public,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(outcome)
    }

    async fn read_url(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String> {
        validate_key(storage_key)?;
        self.presign_get(storage_key, expires_in).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();

        // S3 answers 204 for missing keys; some compatible providers answer 404.
        match self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
        {
            Ok(_) => {}
            Err(SdkError::ServiceError(service_err))
                if service_err.raw().status().as_u16() == 404 =>
            {
                tracing::debug!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 delete of missing key ignored"
                );
                return Ok(());
            }
            Err(e) => {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(match self.sdk_error("delete", e) {
                    StorageError::BackendError(msg) => StorageError::DeleteFailed(msg),
                    other => other,
                });
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        Ok(self.head(storage_key).await?.is_some())
    }

    async fn stat(&self, storage_key: &str) -> StorageResult<Option<FileMetadata>> {
        validate_key(storage_key)?;
        let Some(head) = self.head(storage_key).await? else {
            return Ok(None);
        };

        Ok(Some(FileMetadata {
            size: head.content_length().unwrap_or_default().max(0) as u64,
            last_modified: head
                .last_modified()
                .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())),
            mime_type: head
                .content_type()
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string(),
        }))
    }

    fn backend_type(&self) -> StorageProvider {
        StorageProvider::S3
    }
}
