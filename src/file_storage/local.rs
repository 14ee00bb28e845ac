//! # Local Filesystem Backend

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::backend::{validate_object_name, StorageBackend, StoredObject};
use super::errors::{StorageError, StorageResult};

/// Directory under the storage root holding per-object content types
const META_DIR: &str = ".storify-meta";

/// Content type reported for objects stored without one
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Filesystem object store. Objects live in `<root>/<bucket>/<name>`, their
/// content types in `<root>/.storify-meta/<bucket>/<name>`.
#[derive(Debug)]
pub struct LocalBackend {
    bucket: String,
    bucket_dir: PathBuf,
    meta_dir: PathBuf,
}

impl LocalBackend {
    /// Create a backend for `bucket` under `root`, creating the bucket directory
    pub fn open(root: &Path, bucket: impl Into<String>) -> StorageResult<Self> {
        let bucket = bucket.into();
        validate_object_name(&bucket)?;

        let bucket_dir = root.join(&bucket);
        let meta_dir = root.join(META_DIR).join(&bucket);
        for dir in [&bucket_dir, &meta_dir] {
            fs::create_dir_all(dir).map_err(|e| StorageError::IoError(e.to_string()))?;
        }

        Ok(Self {
            bucket,
            bucket_dir,
            meta_dir,
        })
    }

    fn object_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_object_name(name)?;
        Ok(self.bucket_dir.join(name))
    }

    /// Write `data` to `path` through a staging file in the same directory
    fn write_atomic(dir: &Path, path: &Path, data: &[u8]) -> StorageResult<()> {
        // Readers never observe a half-written file
        let staging = dir.join(format!(".upload-{}", Uuid::new_v4()));
        fs::write(&staging, data).map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::rename(&staging, path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            StorageError::IoError(e.to_string())
        })
    }
}

impl StorageBackend for LocalBackend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
        let path = self.object_path(name)?;

        Self::write_atomic(&self.bucket_dir, &path, data)?;
        Self::write_atomic(&self.meta_dir, &self.meta_dir.join(name), content_type.as_bytes())
    }

    fn get(&self, name: &str) -> StorageResult<StoredObject> {
        let path = self.object_path(name)?;
        let data = fs::read(&path).map_err(|e| StorageError::from_io(name, e))?;

        let content_type = fs::read_to_string(self.meta_dir.join(name))
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        Ok(StoredObject { data, content_type })
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.object_path(name)?;
        fs::remove_file(&path).map_err(|e| StorageError::from_io(name, e))?;

        match fs::remove_file(self.meta_dir.join(name)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(StorageError::IoError(e.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.object_path(name)?.is_file())
    }
}
