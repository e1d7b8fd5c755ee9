//! Configuration module
//!
//! `StorageConfig` is built once at startup, validated, and then shared read-only
//! (typically behind an `Arc`) by the orchestrator and the selected backend.
//! There is no runtime reconfiguration.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_IO_TIMEOUT_SECS, DEFAULT_SIGNED_URL_TTL_SECS, MAX_SIGNED_URL_TTL_SECS,
};
use crate::error::ConfigError;
use crate::storage_types::StorageProvider;

/// S3-compatible object store settings
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Spaces, ...)
    pub public_domain: Option<String>, // Public distribution domain (e.g. a CDN in front of the bucket)
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("public_domain", &self.public_domain)
            .finish()
    }
}

/// Local filesystem settings
#[derive(Clone, Debug)]
pub struct LocalConfig {
    /// Root directory for stored objects
    pub root_path: PathBuf,
    /// Base URL the root directory is served under
    pub base_url: String,
}

/// Backend selection together with its provider-specific parameters
#[derive(Clone, Debug)]
pub enum BackendConfig {
    S3(S3Config),
    Local(LocalConfig),
}

/// Immutable storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: BackendConfig,
    /// Lifetime of signed URLs returned by `put` and by `read_url` without an explicit expiry
    pub signed_url_ttl: Duration,
    /// Upper bound on each backend I/O call
    pub io_timeout: Duration,
}

impl StorageConfig {
    /// Build and validate an S3 configuration with default timings.
    pub fn s3(config: S3Config) -> Result<Self, ConfigError> {
        Self::with_defaults(BackendConfig::S3(config))
    }

    /// Build and validate a local filesystem configuration with default timings.
    pub fn local(
        root_path: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::with_defaults(BackendConfig::Local(LocalConfig {
            root_path: root_path.into(),
            base_url: base_url.into(),
        }))
    }

    fn with_defaults(backend: BackendConfig) -> Result<Self, ConfigError> {
        let config = StorageConfig {
            backend,
            signed_url_ttl: Duration::from_secs(DEFAULT_SIGNED_URL_TTL_SECS),
            io_timeout: Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn provider(&self) -> StorageProvider {
        match self.backend {
            BackendConfig::S3(_) => StorageProvider::S3,
            BackendConfig::Local(_) => StorageProvider::Local,
        }
    }

    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider: StorageProvider = var("STORAGE_PROVIDER")
            .ok_or(ConfigError::MissingProvider)?
            .parse()
            .map_err(|e: anyhow::Error| ConfigError::InvalidValue {
                var: "STORAGE_PROVIDER",
                reason: e.to_string(),
            })?;

        let backend = match provider {
            StorageProvider::S3 => {
                let require = |name: &'static str| {
                    var(name).ok_or(ConfigError::MissingField(name, "s3"))
                };
                BackendConfig::S3(S3Config {
                    bucket: require("S3_BUCKET")?,
                    region: var("S3_REGION")
                        .or_else(|| var("AWS_REGION"))
                        .ok_or(ConfigError::MissingField("S3_REGION or AWS_REGION", "s3"))?,
                    access_key_id: require("AWS_ACCESS_KEY_ID")?,
                    secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                    endpoint: var("S3_ENDPOINT"),
                    public_domain: var("S3_PUBLIC_DOMAIN"),
                })
            }
            StorageProvider::Local => BackendConfig::Local(LocalConfig {
                root_path: var("LOCAL_STORAGE_PATH")
                    .ok_or(ConfigError::MissingField("LOCAL_STORAGE_PATH", "local"))?
                    .into(),
                base_url: var("LOCAL_STORAGE_BASE_URL")
                    .ok_or(ConfigError::MissingField("LOCAL_STORAGE_BASE_URL", "local"))?,
            }),
        };

        let signed_url_ttl = parse_secs(
            var("STORAGE_SIGNED_URL_TTL_SECS"),
            "STORAGE_SIGNED_URL_TTL_SECS",
            DEFAULT_SIGNED_URL_TTL_SECS,
        )?;
        let io_timeout = parse_secs(
            var("STORAGE_IO_TIMEOUT_SECS"),
            "STORAGE_IO_TIMEOUT_SECS",
            DEFAULT_IO_TIMEOUT_SECS,
        )?;

        let config = StorageConfig {
            backend,
            signed_url_ttl,
            io_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.backend {
            BackendConfig::S3(s3) => {
                let fields = [
                    ("S3_BUCKET", &s3.bucket),
                    ("S3_REGION", &s3.region),
                    ("AWS_ACCESS_KEY_ID", &s3.access_key_id),
                    ("AWS_SECRET_ACCESS_KEY", &s3.secret_access_key),
                ];
                for (name, value) in fields {
                    if value.trim().is_empty() {
                        return Err(ConfigError::MissingField(name, "s3"));
                    }
                }
                if let Some(endpoint) = &s3.endpoint {
                    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                        return Err(ConfigError::InvalidValue {
                            var: "S3_ENDPOINT",
                            reason: "must start with http:// or https://".to_string(),
                        });
                    }
                }
            }
            BackendConfig::Local(local) => {
                if local.root_path.as_os_str().is_empty() {
                    return Err(ConfigError::MissingField("LOCAL_STORAGE_PATH", "local"));
                }
                if local.base_url.trim().is_empty() {
                    return Err(ConfigError::MissingField("LOCAL_STORAGE_BASE_URL", "local"));
                }
            }
        }

        if self.signed_url_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                var: "STORAGE_SIGNED_URL_TTL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.signed_url_ttl > Duration::from_secs(MAX_SIGNED_URL_TTL_SECS) {
            return Err(ConfigError::InvalidValue {
                var: "STORAGE_SIGNED_URL_TTL_SECS",
                reason: format!("must not exceed {} seconds", MAX_SIGNED_URL_TTL_SECS),
            });
        }
        if self.io_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                var: "STORAGE_IO_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_secs(
    value: Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        })?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn s3_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("STORAGE_PROVIDER", "s3"),
            ("S3_BUCKET", "decks"),
            ("S3_REGION", "eu-west-1"),
            ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]
    }

    #[test]
    fn test_local_from_lookup() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("STORAGE_PROVIDER", "local"),
            ("LOCAL_STORAGE_PATH", "/var/lib/deckvault"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/uploads"),
        ]))
        .unwrap();

        assert_eq!(config.provider(), StorageProvider::Local);
        assert_eq!(
            config.signed_url_ttl,
            Duration::from_secs(DEFAULT_SIGNED_URL_TTL_SECS)
        );
        assert_eq!(config.io_timeout, Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS));
    }

    #[test]
    fn test_s3_from_lookup_with_region_fallback() {
        let mut vars = s3_vars();
        vars.retain(|(k, _)| *k != "S3_REGION");
        vars.push(("AWS_REGION", "us-east-1"));
        vars.push(("S3_PUBLIC_DOMAIN", "cdn.example.com"));

        let config = StorageConfig::from_lookup(lookup(&vars)).unwrap();
        match config.backend {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.region, "us-east-1");
                assert_eq!(s3.public_domain.as_deref(), Some("cdn.example.com"));
                assert!(s3.endpoint.is_none());
            }
            other => panic!("expected s3 backend, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_provider() {
        let result = StorageConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(ConfigError::MissingProvider)));
    }

    #[test]
    fn test_unknown_provider() {
        let result = StorageConfig::from_lookup(lookup(&[("STORAGE_PROVIDER", "ftp")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                var: "STORAGE_PROVIDER",
                ..
            })
        ));
    }

    #[test]
    fn test_s3_without_credentials_fails() {
        let mut vars = s3_vars();
        vars.retain(|(k, _)| !k.starts_with("AWS_"));

        let result = StorageConfig::from_lookup(lookup(&vars));
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("AWS_ACCESS_KEY_ID", "s3"))
        ));
    }

    #[test]
    fn test_s3_blank_secret_fails_programmatic_validation() {
        let result = StorageConfig::s3(S3Config {
            bucket: "decks".to_string(),
            region: "eu-west-1".to_string(),
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "   ".to_string(),
            endpoint: None,
            public_domain: None,
        });
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("AWS_SECRET_ACCESS_KEY", "s3"))
        ));
    }

    #[test]
    fn test_local_missing_base_url() {
        let result = StorageConfig::from_lookup(lookup(&[
            ("STORAGE_PROVIDER", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/deckvault"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("LOCAL_STORAGE_BASE_URL", "local"))
        ));
    }

    #[test]
    fn test_invalid_ttl() {
        let mut vars = s3_vars();
        vars.push(("STORAGE_SIGNED_URL_TTL_SECS", "soon"));
        assert!(matches!(
            StorageConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidValue {
                var: "STORAGE_SIGNED_URL_TTL_SECS",
                ..
            })
        ));

        let mut vars = s3_vars();
        vars.push(("STORAGE_IO_TIMEOUT_SECS", "0"));
        assert!(StorageConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_ttl_longer_than_a_week_rejected() {
        let mut vars = s3_vars();
        vars.push(("STORAGE_SIGNED_URL_TTL_SECS", "691200"));
        assert!(matches!(
            StorageConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidValue {
                var: "STORAGE_SIGNED_URL_TTL_SECS",
                ..
            })
        ));

        let mut vars = s3_vars();
        vars.push(("STORAGE_SIGNED_URL_TTL_SECS", "604800"));
        assert!(StorageConfig::from_lookup(lookup(&vars)).is_ok());

        let mut config = StorageConfig::local("/tmp/deckvault", "http://localhost").unwrap();
        config.signed_url_ttl = Duration::from_secs(MAX_SIGNED_URL_TTL_SECS + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_endpoint_scheme() {
        let mut vars = s3_vars();
        vars.push(("S3_ENDPOINT", "minio:9000"));
        assert!(matches!(
            StorageConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidValue {
                var: "S3_ENDPOINT",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StorageConfig::from_lookup(lookup(&s3_vars())).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("secret\""));
        assert!(debug.contains("<redacted>"));
    }
}
