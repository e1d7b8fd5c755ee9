/// Image pipeline errors
///
/// Any of these aborts an upload before a single byte reaches a backend.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid transformation parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl From<image::ImageError> for ProcessingError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => ProcessingError::Encode(e.to_string()),
            image::ImageError::Parameter(e) => ProcessingError::InvalidParameter(e.to_string()),
            other => ProcessingError::Decode(other.to_string()),
        }
    }
}
