//! Image transformer - the transform and thumbnail entry points
//!
//! `transform` is the main pipeline for the stored object:
//! 1. Content the decoder cannot read (documents, SVG, AVIF...) passes through untouched
//! 2. Decode (only when a resize or format change is requested)
//! 3. Resize (if requested, never enlarging)
//! 4. Encode to the requested or source format
//!
//! `thumbnail` is an independent path over the original bytes.

use crate::compression::ImageCompressor;
use crate::error::ProcessingError;
use crate::image::processor::ImageProcessor;
use crate::image::resize::ImageResize;
use bytes::Bytes;
use deckvault_core::constants::{DEFAULT_QUALITY, THUMBNAIL_QUALITY, THUMBNAIL_SIZE};
use deckvault_core::{OutputFormat, UploadOptions};
use image::GenericImageView;

/// Output of the pipeline: the bytes to store and what they are
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedAsset {
    pub data: Bytes,
    pub mime_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ProcessedAsset {
    fn passthrough(data: Bytes, mime_type: &str) -> Self {
        Self {
            data,
            mime_type: mime_type.to_string(),
            width: None,
            height: None,
        }
    }
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Apply `options` to `data` of type `content_type`
    pub fn transform(
        data: Bytes,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<ProcessedAsset, ProcessingError> {
        if !ImageProcessor::is_decodable(content_type) {
            tracing::debug!(content_type = %content_type, "Not a decodable image, passing through");
            return Ok(ProcessedAsset::passthrough(data, content_type));
        }

        if let Some(quality) = options.quality {
            Self::validate_quality(quality)?;
        }

        if !options.requires_transform() {
            let (width, height) = ImageProcessor::dimensions(&data)?;
            return Ok(ProcessedAsset {
                data,
                mime_type: content_type.to_string(),
                width: Some(width),
                height: Some(height),
            });
        }

        let img = ImageProcessor::decode(&data)?;
        let (src_width, src_height) = img.dimensions();

        let img = match &options.resize {
            Some(resize) => ImageResize::apply_resize(img, resize)?,
            None => img,
        };

        let format = options
            .format
            .or_else(|| OutputFormat::from_mime_type(content_type))
            .unwrap_or(OutputFormat::Png);
        let quality = options.quality.unwrap_or(DEFAULT_QUALITY);
        let encoded = ImageCompressor::compress(&img, format, quality)?;
        let (width, height) = img.dimensions();

        tracing::debug!(
            src_width = src_width,
            src_height = src_height,
            width = width,
            height = height,
            format = ?format,
            original_size = data.len(),
            size = encoded.len(),
            "Image transformed"
        );

        Ok(ProcessedAsset {
            data: encoded,
            mime_type: format.to_mime_type().to_string(),
            width: Some(width),
            height: Some(height),
        })
    }

    /// Square cover-cropped JPEG thumbnail of the original bytes
    pub fn thumbnail(data: &[u8]) -> Result<ProcessedAsset, ProcessingError> {
        let img = ImageProcessor::decode(data)?;
        let thumb = ImageResize::cover_square(&img, THUMBNAIL_SIZE);
        let encoded = ImageCompressor::compress(&thumb, OutputFormat::Jpeg, THUMBNAIL_QUALITY)?;
        let (width, height) = thumb.dimensions();

        Ok(ProcessedAsset {
            data: encoded,
            mime_type: OutputFormat::Jpeg.to_mime_type().to_string(),
            width: Some(width),
            height: Some(height),
        })
    }

    fn validate_quality(quality: u8) -> Result<(), ProcessingError> {
        if !(1..=100).contains(&quality) {
            return Err(ProcessingError::InvalidParameter(format!(
                "quality must be between 1 and 100, got {}",
                quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckvault_core::{Fit, ResizeOptions};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Bytes {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 30, 60, 255]),
        ));
        let img = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        };
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        Bytes::from(buffer)
    }

    fn format_of(data: &[u8]) -> ImageFormat {
        image::guess_format(data).unwrap()
    }

    #[test]
    fn test_document_passthrough() {
        let data = Bytes::from_static(b"%PDF-1.4 not really a pdf");
        let options = UploadOptions {
            resize: Some(ResizeOptions::width(10)),
            format: Some(OutputFormat::WebP),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data.clone(), "application/pdf", &options).unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.mime_type, "application/pdf");
        assert_eq!(out.width, None);
    }

    #[test]
    fn test_svg_passthrough() {
        let data = Bytes::from_static(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        let options = UploadOptions {
            format: Some(OutputFormat::Png),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data.clone(), "image/svg+xml", &options).unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.mime_type, "image/svg+xml");
    }

    #[test]
    fn test_undecodable_image_type_passthrough() {
        // ISO-BMFF header of an AVIF file; this build has no AVIF decoder
        let data = Bytes::from_static(b"\0\0\0\x1cftypavif\0\0\0\0avifmif1miaf");
        for options in [
            UploadOptions::default(),
            UploadOptions {
                resize: Some(ResizeOptions::width(100)),
                format: Some(OutputFormat::Jpeg),
                ..Default::default()
            },
        ] {
            let out = ImageTransformer::transform(data.clone(), "image/avif", &options).unwrap();
            assert_eq!(out.data, data);
            assert_eq!(out.mime_type, "image/avif");
            assert_eq!((out.width, out.height), (None, None));
        }
    }

    #[test]
    fn test_quality_ignored_for_passthrough() {
        let data = Bytes::from_static(b"%PDF-1.4");
        let options = UploadOptions {
            quality: Some(0),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data.clone(), "application/pdf", &options).unwrap();
        assert_eq!(out.data, data);
    }

    #[test]
    fn test_no_transform_reads_dimensions() {
        let data = encoded(40, 30, ImageFormat::Png);
        let out =
            ImageTransformer::transform(data.clone(), "image/png", &UploadOptions::default())
                .unwrap();
        assert_eq!(out.data, data);
        assert_eq!((out.width, out.height), (Some(40), Some(30)));
    }

    #[test]
    fn test_resize_and_convert_to_webp() {
        let data = encoded(1920, 1080, ImageFormat::Jpeg);
        let options = UploadOptions {
            resize: Some(ResizeOptions::width(800)),
            format: Some(OutputFormat::WebP),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data, "image/jpeg", &options).unwrap();
        assert_eq!(out.mime_type, "image/webp");
        assert_eq!(format_of(&out.data), ImageFormat::WebP);
        assert_eq!((out.width, out.height), (Some(800), Some(450)));
    }

    #[test]
    fn test_resize_keeps_source_format() {
        let data = encoded(200, 100, ImageFormat::Png);
        let options = UploadOptions {
            resize: Some(ResizeOptions::width(100).with_fit(Fit::Inside)),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data, "image/png", &options).unwrap();
        assert_eq!(out.mime_type, "image/png");
        assert_eq!(format_of(&out.data), ImageFormat::Png);
        assert_eq!((out.width, out.height), (Some(100), Some(50)));
    }

    #[test]
    fn test_resize_unencodable_source_falls_back_to_png() {
        let data = encoded(64, 64, ImageFormat::Gif);
        let options = UploadOptions {
            resize: Some(ResizeOptions::width(32)),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data, "image/gif", &options).unwrap();
        assert_eq!(out.mime_type, "image/png");
        assert_eq!(format_of(&out.data), ImageFormat::Png);
    }

    #[test]
    fn test_no_upscale() {
        let data = encoded(100, 100, ImageFormat::Png);
        let options = UploadOptions {
            resize: Some(ResizeOptions::width(500)),
            ..Default::default()
        };
        let out = ImageTransformer::transform(data, "image/png", &options).unwrap();
        assert!(out.width.unwrap() <= 100);
        assert!(out.height.unwrap() <= 100);
    }

    #[test]
    fn test_invalid_quality() {
        let data = encoded(10, 10, ImageFormat::Png);
        let options = UploadOptions {
            quality: Some(0),
            format: Some(OutputFormat::Jpeg),
            ..Default::default()
        };
        assert!(matches!(
            ImageTransformer::transform(data, "image/png", &options),
            Err(ProcessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_undecodable_image() {
        let options = UploadOptions {
            format: Some(OutputFormat::Jpeg),
            ..Default::default()
        };
        assert!(ImageTransformer::transform(
            Bytes::from_static(b"definitely not a png"),
            "image/png",
            &options
        )
        .is_err());
        assert!(ImageTransformer::transform(
            Bytes::from_static(b"definitely not a png"),
            "image/png",
            &UploadOptions::default()
        )
        .is_err());
    }

    #[test]
    fn test_thumbnail() {
        let data = encoded(1920, 1080, ImageFormat::Png);
        let thumb = ImageTransformer::thumbnail(&data).unwrap();
        assert_eq!(thumb.mime_type, "image/jpeg");
        assert_eq!((thumb.width, thumb.height), (Some(300), Some(300)));
        assert_eq!(format_of(&thumb.data), ImageFormat::Jpeg);
    }
}
