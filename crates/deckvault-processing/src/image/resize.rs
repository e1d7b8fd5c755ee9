//! Resize planning and application.
//!
//! Enlargement is never performed: for every fit the output width is at most the
//! source width and the output height at most the source height. A requested box
//! larger than the source is clamped to the source.

use crate::error::ProcessingError;
use deckvault_core::{Fit, ResizeOptions};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Concrete operations derived from `ResizeOptions` and the source size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Source already satisfies the request
    Keep,
    /// Resample to exactly this size
    Scale { width: u32, height: u32 },
    /// Resample, then center-crop to the box
    ScaleAndCrop {
        width: u32,
        height: u32,
        crop_width: u32,
        crop_height: u32,
    },
    /// Resample, then center on a transparent canvas of the box size
    ScaleAndPad {
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },
}

pub struct ImageResize;

impl ImageResize {
    /// Compute the plan for a source of `src_width` x `src_height`
    pub fn plan(
        src_width: u32,
        src_height: u32,
        options: &ResizeOptions,
    ) -> Result<ResizePlan, ProcessingError> {
        if options.width == Some(0) || options.height == Some(0) {
            return Err(ProcessingError::InvalidParameter(
                "resize width and height must be greater than zero".to_string(),
            ));
        }
        if src_width == 0 || src_height == 0 {
            return Err(ProcessingError::Decode("image has no pixels".to_string()));
        }

        let plan = match (options.width, options.height) {
            (None, None) => ResizePlan::Keep,
            // A single side scales proportionally whatever the fit
            (Some(w), None) => {
                let scale = (w as f64 / src_width as f64).min(1.0);
                Self::scaled(src_width, src_height, scale)
            }
            (None, Some(h)) => {
                let scale = (h as f64 / src_height as f64).min(1.0);
                Self::scaled(src_width, src_height, scale)
            }
            (Some(box_w), Some(box_h)) => {
                let scale_w = box_w as f64 / src_width as f64;
                let scale_h = box_h as f64 / src_height as f64;
                // Both clamped boxes are within the source and within the requested box
                let clamp_w = box_w.min(src_width);
                let clamp_h = box_h.min(src_height);

                match options.fit {
                    Fit::Fill => ResizePlan::Scale {
                        width: clamp_w,
                        height: clamp_h,
                    },
                    Fit::Inside => {
                        Self::scaled(src_width, src_height, scale_w.min(scale_h).min(1.0))
                    }
                    Fit::Outside => {
                        Self::scaled(src_width, src_height, scale_w.max(scale_h).min(1.0))
                    }
                    Fit::Cover => {
                        let scale = scale_w.max(scale_h).min(1.0);
                        let (width, height) = Self::scaled_dims(src_width, src_height, scale);
                        ResizePlan::ScaleAndCrop {
                            width,
                            height,
                            crop_width: clamp_w.min(width),
                            crop_height: clamp_h.min(height),
                        }
                    }
                    Fit::Contain => {
                        let scale = scale_w.min(scale_h).min(1.0);
                        let (width, height) = Self::scaled_dims(src_width, src_height, scale);
                        ResizePlan::ScaleAndPad {
                            width,
                            height,
                            canvas_width: clamp_w.max(width),
                            canvas_height: clamp_h.max(height),
                        }
                    }
                }
            }
        };

        Ok(Self::simplify(plan, src_width, src_height))
    }

    /// Apply `options` to `img`
    pub fn apply_resize(
        img: DynamicImage,
        options: &ResizeOptions,
    ) -> Result<DynamicImage, ProcessingError> {
        let (src_width, src_height) = img.dimensions();
        let plan = Self::plan(src_width, src_height, options)?;

        tracing::debug!(
            src_width = src_width,
            src_height = src_height,
            fit = ?options.fit,
            plan = ?plan,
            "Applying resize"
        );

        Ok(match plan {
            ResizePlan::Keep => img,
            ResizePlan::Scale { width, height } => Self::resample(img, width, height),
            ResizePlan::ScaleAndCrop {
                width,
                height,
                crop_width,
                crop_height,
            } => {
                let scaled = Self::resample(img, width, height);
                let x = (width - crop_width) / 2;
                let y = (height - crop_height) / 2;
                scaled.crop_imm(x, y, crop_width, crop_height)
            }
            ResizePlan::ScaleAndPad {
                width,
                height,
                canvas_width,
                canvas_height,
            } => {
                let scaled = Self::resample(img, width, height);
                let mut canvas = RgbaImage::new(canvas_width, canvas_height);
                let x = (canvas_width - width) / 2;
                let y = (canvas_height - height) / 2;
                image::imageops::overlay(&mut canvas, &scaled.to_rgba8(), x as i64, y as i64);
                DynamicImage::ImageRgba8(canvas)
            }
        })
    }

    /// Square cover crop used for thumbnails. Unlike `apply_resize` this always
    /// produces exactly `size` x `size`.
    pub fn cover_square(img: &DynamicImage, size: u32) -> DynamicImage {
        img.resize_to_fill(size, size, FilterType::Lanczos3)
    }

    fn resample(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
        if img.dimensions() == (width, height) {
            return img;
        }
        img.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn scaled(src_width: u32, src_height: u32, scale: f64) -> ResizePlan {
        let (width, height) = Self::scaled_dims(src_width, src_height, scale);
        ResizePlan::Scale { width, height }
    }

    fn scaled_dims(src_width: u32, src_height: u32, scale: f64) -> (u32, u32) {
        let dim = |src: u32| ((src as f64 * scale).round() as u32).clamp(1, src);
        (dim(src_width), dim(src_height))
    }

    /// Collapse plans that would leave the source untouched
    fn simplify(plan: ResizePlan, src_width: u32, src_height: u32) -> ResizePlan {
        let is_source = |w: u32, h: u32| w == src_width && h == src_height;
        match plan {
            ResizePlan::Scale { width, height } if is_source(width, height) => ResizePlan::Keep,
            ResizePlan::ScaleAndCrop {
                width,
                height,
                crop_width,
                crop_height,
            } if crop_width == width && crop_height == height => {
                Self::simplify(ResizePlan::Scale { width, height }, src_width, src_height)
            }
            ResizePlan::ScaleAndPad {
                width,
                height,
                canvas_width,
                canvas_height,
            } if canvas_width == width && canvas_height == height => {
                Self::simplify(ResizePlan::Scale { width, height }, src_width, src_height)
            }
            other => other,
        }
    }
}
