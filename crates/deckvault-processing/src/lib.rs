//! Deckvault Processing Library
//!
//! Image transformation pipeline for uploaded assets:
//! - input validation and MIME resolution (`validator`)
//! - resize planning that never enlarges the source (`image::resize`)
//! - re-encoding to JPEG, PNG or WebP (`compression`)
//! - the fixed thumbnail path (`ImageTransformer::thumbnail`)
//! - async entry points that keep decoding off the async pool (`upload`)
//!
//! Non-image content is never decoded.

pub mod compression;
pub mod error;
pub mod image;
pub mod upload;
pub mod validator;

pub use compression::ImageCompressor;
pub use error::ProcessingError;
pub use crate::image::{ImageProcessor, ImageTransformer, ProcessedAsset};
pub use upload::AssetProcessor;
pub use validator::{UploadValidator, ValidationError};
