//! Deckvault Core Library
//!
//! This crate provides the configuration, shared models, constants and error types
//! used by every Deckvault component: the storage backends, the image pipeline and
//! the asset storage orchestrator.

pub mod config;
pub mod constants;
pub mod error;
pub mod mime;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BackendConfig, LocalConfig, S3Config, StorageConfig};
pub use error::ConfigError;
pub use models::{
    FileMetadata, Fit, OutputFormat, PutOutcome, ResizeOptions, UploadOptions, UploadResult,
};
pub use storage_types::StorageProvider;
