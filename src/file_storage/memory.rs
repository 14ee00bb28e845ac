//! # In-Memory Backend

use std::collections::HashMap;
use std::sync::RwLock;

use super::backend::{validate_object_name, StorageBackend, StoredObject};
use super::errors::{StorageError, StorageResult};

/// Process-local object store, mostly useful for tests and demos
#[derive(Debug)]
pub struct MemoryBackend {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryBackend {
    /// Create an empty bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
        validate_object_name(name)?;
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::Internal("object map poisoned".to_string()))?;
        objects.insert(
            name.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn get(&self, name: &str) -> StorageResult<StoredObject> {
        validate_object_name(name)?;
        let objects = self
            .objects
            .read()
            .map_err(|_| StorageError::Internal("object map poisoned".to_string()))?;
        objects
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(name.to_string()))
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        validate_object_name(name)?;
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::Internal("object map poisoned".to_string()))?;
        objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::ObjectNotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        validate_object_name(name)?;
        let objects = self
            .objects
            .read()
            .map_err(|_| StorageError::Internal("object map poisoned".to_string()))?;
        Ok(objects.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let backend = MemoryBackend::new("mem");
        assert!(backend.is_empty());

        backend.put("a.txt", b"alpha", "text/plain").unwrap();
        let object = backend.get("a.txt").unwrap();
        assert_eq!(object.data, b"alpha");
        assert_eq!(object.content_type, "text/plain");
        assert_eq!(backend.len(), 1);

        backend.delete("a.txt").unwrap();
        assert!(!backend.exists("a.txt").unwrap());
        assert!(matches!(backend.delete("a.txt"), Err(StorageError::ObjectNotFound(_))));
    }

    #[test]
    fn test_bucket_name() {
        assert_eq!(MemoryBackend::new("storify-cloud-files").bucket(), "storify-cloud-files");
    }
}
