//! Key generation shared by every backend.
//!
//! A main key combines a random v4 UUID, the creation time in unix milliseconds and
//! the original extension, so uploads never need a lookup against existing keys.
//! A thumbnail key is derived mechanically from its parent key.

use crate::traits::{StorageError, StorageResult};
use deckvault_core::constants::THUMBNAIL_SUFFIX;
use deckvault_core::mime::extension_of;
use uuid::Uuid;

/// Generate a unique storage key for `filename`, optionally under `folder`.
///
/// Fails with `InvalidKey` when the filename has no extension or the folder would
/// produce an unsafe key.
pub fn generate_key(filename: &str, folder: Option<&str>) -> StorageResult<String> {
    let extension = extension_of(filename).ok_or_else(|| {
        StorageError::InvalidKey(format!("filename has no extension: {}", filename))
    })?;

    let name = format!(
        "{}-{}.{}",
        Uuid::new_v4(),
        chrono::Utc::now().timestamp_millis(),
        extension
    );

    let key = match folder.map(|f| f.trim_matches('/')).filter(|f| !f.is_empty()) {
        Some(folder) => format!("{}/{}", folder, name),
        None => name,
    };

    validate_key(&key)?;
    Ok(key)
}

/// Derive the thumbnail key from a main key: `a/b/c.png` becomes `a/b/c_thumb.jpg`.
pub fn derive_thumbnail_key(main_key: &str) -> String {
    let segment_start = main_key.rfind('/').map(|i| i + 1).unwrap_or(0);
    let stem_end = main_key[segment_start..]
        .rfind('.')
        .filter(|&i| i > 0)
        .map(|i| segment_start + i)
        .unwrap_or(main_key.len());
    format!("{}{}", &main_key[..stem_end], THUMBNAIL_SUFFIX)
}

/// Reject keys that could escape the storage root or address nothing.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\')
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Percent-encode each path segment of a key for use in a URL.
pub(crate) fn encode_key(storage_key: &str) -> String {
    storage_key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
