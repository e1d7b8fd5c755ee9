//! Explicit defaults shared across crates.

/// Encoder quality used when a format conversion or resize is requested without a quality.
pub const DEFAULT_QUALITY: u8 = 85;

/// Thumbnails are always a square crop of this edge length.
pub const THUMBNAIL_SIZE: u32 = 300;

/// Thumbnails are always JPEG at this quality.
pub const THUMBNAIL_QUALITY: u8 = 80;

/// Suffix replacing the main key's extension to form the thumbnail key.
pub const THUMBNAIL_SUFFIX: &str = "_thumb.jpg";

/// Lifetime of signed URLs when the caller does not ask for another one.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// Upper bound on a single backend I/O call.
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 30;

/// MIME type used when neither the caller nor the extension tells us better.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Longest lifetime an S3 SigV4 presigned URL may have (one week).
pub const MAX_SIGNED_URL_TTL_SECS: u64 = 604_800;
