use deckvault_core::mime::{content_type_for_filename, extension_of};

/// Input validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty file")]
    EmptyFile,

    #[error("Invalid filename (an extension is required): {0}")]
    InvalidFilename(String),

    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
}

/// Upload input validator
///
/// Checks the input contract before anything is decoded or stored: non-empty bytes,
/// a filename with a resolvable extension, and a well-formed MIME type.
pub struct UploadValidator;

impl UploadValidator {
    /// Validate file size
    pub fn validate_file_size(size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        Ok(())
    }

    /// Validate file extension
    pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
        extension_of(filename).ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))
    }

    /// Resolve the MIME type: the declared one when given, else inferred from the extension.
    pub fn resolve_content_type(
        filename: &str,
        declared: Option<&str>,
    ) -> Result<String, ValidationError> {
        match declared.map(str::trim).filter(|ct| !ct.is_empty()) {
            Some(content_type) => {
                let essence = content_type
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_lowercase();
                match essence.split_once('/') {
                    Some((kind, sub)) if !kind.is_empty() && !sub.is_empty() => Ok(essence),
                    _ => Err(ValidationError::InvalidContentType(content_type.to_string())),
                }
            }
            None => Ok(content_type_for_filename(filename).to_string()),
        }
    }

    /// Validate all aspects of an upload and return the resolved MIME type
    pub fn validate_all(
        filename: &str,
        declared_content_type: Option<&str>,
        file_size: usize,
    ) -> Result<String, ValidationError> {
        Self::validate_file_size(file_size)?;
        Self::validate_filename(filename)?;
        Self::resolve_content_type(filename, declared_content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(
            UploadValidator::validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
        assert!(UploadValidator::validate_file_size(1).is_ok());
    }

    #[test]
    fn test_filename_requires_extension() {
        assert_eq!(
            UploadValidator::validate_filename("deck.PDF").unwrap(),
            "pdf"
        );
        assert!(matches!(
            UploadValidator::validate_filename("Makefile"),
            Err(ValidationError::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_declared_content_type_wins() {
        let ct = UploadValidator::resolve_content_type("photo.bin", Some("Image/PNG; q=1")).unwrap();
        assert_eq!(ct, "image/png");
    }

    #[test]
    fn test_content_type_inferred_from_extension() {
        let ct = UploadValidator::resolve_content_type("photo.jpeg", None).unwrap();
        assert_eq!(ct, "image/jpeg");

        let ct = UploadValidator::resolve_content_type("photo.jpeg", Some("  ")).unwrap();
        assert_eq!(ct, "image/jpeg");

        let ct = UploadValidator::resolve_content_type("data.unknown", None).unwrap();
        assert_eq!(ct, "application/octet-stream");
    }

    #[test]
    fn test_malformed_content_type_rejected() {
        assert!(matches!(
            UploadValidator::resolve_content_type("a.png", Some("png")),
            Err(ValidationError::InvalidContentType(_))
        ));
        assert!(UploadValidator::resolve_content_type("a.png", Some("image/")).is_err());
    }

    #[test]
    fn test_validate_all() {
        assert_eq!(
            UploadValidator::validate_all("talk.pdf", None, 10).unwrap(),
            "application/pdf"
        );
        assert!(UploadValidator::validate_all("talk.pdf", None, 0).is_err());
        assert!(UploadValidator::validate_all("talk", None, 10).is_err());
    }
}
