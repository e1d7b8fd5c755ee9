//! Test helpers for orchestrator unit tests
//!
//! An in-memory `Storage` so the upload sequence can be tested without a
//! filesystem or network, including injected backend failures.

pub mod mock_storage;

pub use mock_storage::*;
