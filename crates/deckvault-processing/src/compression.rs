use crate::error::ProcessingError;
use bytes::Bytes;
use deckvault_core::OutputFormat;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Image encoder
///
/// JPEG goes through mozjpeg (progressive, optimized Huffman tables), WebP through
/// libwebp, PNG through the `image` crate. PNG is lossless, so `quality` does not
/// apply to it.
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` as `format` at `quality` (1-100)
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Bytes, ProcessingError> {
        if !(1..=100).contains(&quality) {
            return Err(ProcessingError::InvalidParameter(format!(
                "quality must be between 1 and 100, got {}",
                quality
            )));
        }

        tracing::debug!(
            format = ?format,
            quality = quality,
            width = img.width(),
            height = img.height(),
            "Encoding image"
        );

        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img, quality),
        }
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ProcessingError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let encode_err = |e: std::io::Error| ProcessingError::Encode(e.to_string());
        let mut comp = comp.start_compress(Vec::new()).map_err(encode_err)?;
        comp.write_scanlines(&rgb_img).map_err(encode_err)?;
        let jpeg_data = comp.finish().map_err(encode_err)?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes, ProcessingError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to WebP
    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes, ProcessingError> {
        let (width, height) = img.dimensions();

        // Convert to RGBA for WebP encoding
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
