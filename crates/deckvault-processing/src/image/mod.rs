//! Image processing module
//!
//! - Dimension probing (processor)
//! - Resize planning that never enlarges (resize)
//! - Transform and thumbnail entry points (transformer)

pub mod processor;
pub mod resize;
pub mod transformer;

pub use processor::ImageProcessor;
pub use resize::ImageResize;
pub use transformer::{ImageTransformer, ProcessedAsset};
