//! # File Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object store errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    // Object errors
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidObjectName(String),

    // Signed URL errors
    #[error("URL expired")]
    UrlExpired,

    #[error("Invalid signature")]
    InvalidSignature,

    // I/O errors
    #[error("I/O error: {0}")]
    IoError(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::ObjectNotFound(_) => 404,
            StorageError::InvalidObjectName(_) => 400,
            StorageError::UrlExpired => 403,
            StorageError::InvalidSignature => 403,
            StorageError::IoError(_) => 500,
            StorageError::Internal(_) => 500,
        }
    }

    /// Map an I/O error for `name`, turning `NotFound` into `ObjectNotFound`
    pub(crate) fn from_io(name: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::ObjectNotFound(name.to_string())
        } else {
            StorageError::IoError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StorageError::ObjectNotFound("a.txt".into()).status_code(), 404);
        assert_eq!(StorageError::InvalidObjectName("..".into()).status_code(), 400);
        assert_eq!(StorageError::UrlExpired.status_code(), 403);
        assert_eq!(StorageError::IoError("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_from_io_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            StorageError::from_io("x.bin", err),
            StorageError::ObjectNotFound(name) if name == "x.bin"
        ));

        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(StorageError::from_io("x.bin", err), StorageError::IoError(_)));
    }
}
