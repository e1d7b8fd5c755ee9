//! Deckvault Services Library
//!
//! `AssetStorage` is the entry point for callers: it validates the input, runs the
//! image pipeline, writes the main object and optional thumbnail through the
//! configured backend, and assembles the `UploadResult`.

pub mod assets;
pub mod error;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assets::{AssetStorage, UploadInput};
pub use error::AssetError;

// Re-export the types callers need alongside the orchestrator
pub use deckvault_core::{
    FileMetadata, Fit, OutputFormat, ResizeOptions, StorageConfig, UploadOptions, UploadResult,
};
pub use deckvault_processing::ProcessingError;
pub use deckvault_storage::{Storage, StorageError, StorageProvider};
