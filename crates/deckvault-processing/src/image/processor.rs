//! Image processor - decoding and dimension probing

use crate::error::ProcessingError;
use deckvault_core::mime::{is_raster_image, mime_essence};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// True when `content_type` is a raster format this build can decode.
    ///
    /// Anything else (SVG, AVIF, HEIC, TIFF...) is stored as-is.
    pub fn is_decodable(content_type: &str) -> bool {
        if !is_raster_image(content_type) {
            return false;
        }
        let essence = match mime_essence(content_type).as_str() {
            "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
            other => other.to_string(),
        };
        ImageFormat::from_mime_type(essence).is_some_and(|format| format.reading_enabled())
    }

    /// Decode image bytes, guessing the format from the content rather than the declared type
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(ProcessingError::Decode(
                "unrecognized image format".to_string(),
            ));
        }
        Ok(reader.decode()?)
    }

    /// Read width and height from the image header without decoding pixels
    pub fn dimensions(data: &[u8]) -> Result<(u32, u32), ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(ProcessingError::Decode(
                "unrecognized image format".to_string(),
            ));
        }
        Ok(reader.into_dimensions()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};

    fn create_test_image() -> Vec<u8> {
        let img = RgbaImage::from_pixel(100, 60, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        buffer
    }

    #[test]
    fn test_is_decodable() {
        assert!(ImageProcessor::is_decodable("image/jpeg"));
        assert!(ImageProcessor::is_decodable("image/jpg"));
        assert!(ImageProcessor::is_decodable("IMAGE/PNG; charset=binary"));
        assert!(ImageProcessor::is_decodable("image/webp"));
        assert!(ImageProcessor::is_decodable("image/gif"));
        assert!(!ImageProcessor::is_decodable("image/avif"));
        assert!(!ImageProcessor::is_decodable("image/heic"));
        assert!(!ImageProcessor::is_decodable("image/svg+xml"));
        assert!(!ImageProcessor::is_decodable("application/pdf"));
    }

    #[test]
    fn test_decode() {
        let img = ImageProcessor::decode(&create_test_image()).unwrap();
        assert_eq!(img.dimensions(), (100, 60));
    }

    #[test]
    fn test_decode_invalid_image() {
        assert!(matches!(
            ImageProcessor::decode(b"not an image"),
            Err(ProcessingError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_truncated_image() {
        let data = create_test_image();
        assert!(ImageProcessor::decode(&data[..30]).is_err());
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(
            ImageProcessor::dimensions(&create_test_image()).unwrap(),
            (100, 60)
        );
        assert!(ImageProcessor::dimensions(b"%PDF-1.4").is_err());
    }
}
