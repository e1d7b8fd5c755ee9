//! Asset storage orchestration

pub mod input;
pub mod service;

pub use input::UploadInput;
pub use service::AssetStorage;
