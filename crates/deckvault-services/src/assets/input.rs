use crate::error::AssetError;
use bytes::Bytes;
use std::path::PathBuf;

/// Upload source: an in-memory buffer or a file on disk
#[derive(Debug, Clone)]
pub enum UploadInput {
    Bytes(Bytes),
    File(PathBuf),
}

impl UploadInput {
    /// Load the input into memory
    pub async fn into_bytes(self) -> Result<Bytes, AssetError> {
        match self {
            UploadInput::Bytes(data) => Ok(data),
            UploadInput::File(path) => tokio::fs::read(&path).await.map(Bytes::from).map_err(|e| {
                AssetError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
            }),
        }
    }
}

impl From<Bytes> for UploadInput {
    fn from(data: Bytes) -> Self {
        UploadInput::Bytes(data)
    }
}

impl From<Vec<u8>> for UploadInput {
    fn from(data: Vec<u8>) -> Self {
        UploadInput::Bytes(Bytes::from(data))
    }
}

impl From<&'static [u8]> for UploadInput {
    fn from(data: &'static [u8]) -> Self {
        UploadInput::Bytes(Bytes::from_static(data))
    }
}

impl From<PathBuf> for UploadInput {
    fn from(path: PathBuf) -> Self {
        UploadInput::File(path)
    }
}
