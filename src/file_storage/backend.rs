//! # Storage Backend Trait

use super::errors::{StorageError, StorageResult};

/// Object bytes together with the content type recorded at upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object store collaborator scoped to a single bucket.
///
/// Implementations are keyed by flat object names; callers are expected to
/// pass names through [`validate_object_name`] first.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Bucket this backend writes into
    fn bucket(&self) -> &str;

    /// Store `data` under `name`, replacing any existing object
    fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<()>;

    /// Read the object stored under `name`
    fn get(&self, name: &str) -> StorageResult<StoredObject>;

    /// Delete the object stored under `name`
    fn delete(&self, name: &str) -> StorageResult<()>;

    /// Check if an object exists
    fn exists(&self, name: &str) -> StorageResult<bool>;
}

/// Reject object names that cannot be used as a flat key.
pub fn validate_object_name(name: &str) -> StorageResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if invalid {
        return Err(StorageError::InvalidObjectName(name.to_string()));
    }
    Ok(())
}
