//! Deckvault Storage Library
//!
//! This crate provides the `Storage` trait and its two implementations: an
//! S3-compatible object store and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are generated once per upload by the `keys` module:
//!
//! - **Main object**: `[{folder}/]{uuid}-{unix_millis}.{ext}`
//! - **Thumbnail**: the main key with its extension replaced by `_thumb.jpg`
//!
//! Keys must not be empty, contain `..`, or start with `/`. Every backend rejects
//! such keys with `StorageError::InvalidKey`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use deckvault_core::StorageProvider;
pub use factory::create_storage;
pub use keys::{derive_thumbnail_key, generate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
