//! Request-scoped value objects passed between the orchestrator, the image
//! pipeline and the storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a resize fits the source into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Preserve aspect ratio, cover the whole box, crop the overflow
    #[default]
    Cover,
    /// Preserve aspect ratio, fit within the box, pad the remainder
    Contain,
    /// Ignore aspect ratio and stretch to the box
    Fill,
    /// Preserve aspect ratio, both sides less than or equal to the box
    Inside,
    /// Preserve aspect ratio, both sides greater than or equal to the box
    Outside,
}

impl FromStr for Fit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(Fit::Cover),
            "contain" => Ok(Fit::Contain),
            "fill" => Ok(Fit::Fill),
            "inside" => Ok(Fit::Inside),
            "outside" => Ok(Fit::Outside),
            _ => Err(anyhow::anyhow!("Invalid fit: {}", s)),
        }
    }
}

/// Output format for re-encoded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Map a MIME type to an encodable output format, if we can encode it.
    pub fn from_mime_type(content_type: &str) -> Option<Self> {
        match content_type.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(OutputFormat::Jpeg),
            "image/png" => Some(OutputFormat::Png),
            "image/webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(anyhow::anyhow!("Invalid format: {}", s)),
        }
    }
}

/// Target box for a resize. A missing side is derived from the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub fit: Fit,
}

impl ResizeOptions {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = fit;
        self
    }
}

/// Per-call upload options.
///
/// Every field is opt-in: absence disables the feature. The only implied values are
/// `constants::DEFAULT_QUALITY` when re-encoding without a quality, and the fixed
/// thumbnail geometry (`constants::THUMBNAIL_SIZE`, `constants::THUMBNAIL_QUALITY`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadOptions {
    pub folder: Option<String>,
    pub resize: Option<ResizeOptions>,
    pub quality: Option<u8>,
    pub format: Option<OutputFormat>,
    pub generate_thumbnail: bool,
    pub make_public: bool,
}

impl UploadOptions {
    /// True when the pipeline has to decode and re-encode the image.
    pub fn requires_transform(&self) -> bool {
        self.resize.is_some() || self.format.is_some()
    }
}

/// URLs returned by a backend after writing an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    /// Access URL, possibly time-limited
    pub url: String,
    /// Stable public URL, only when the object was made public
    pub public_url: Option<String>,
}

/// Result of a successful upload. Never persisted by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub key: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub size: u64,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Object metadata returned by `stat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub size: u64,
    /// Not every S3-compatible provider reports it on HEAD
    pub last_modified: Option<DateTime<Utc>>,
    pub mime_type: String,
}
