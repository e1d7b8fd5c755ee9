//! Configuration errors.
//!
//! These are fatal at startup: a process that cannot build a valid `StorageConfig`
//! must not continue.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set when using the {1} storage provider")]
    MissingField(&'static str, &'static str),

    #[error("STORAGE_PROVIDER must be set (one of: s3, local)")]
    MissingProvider,

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}
