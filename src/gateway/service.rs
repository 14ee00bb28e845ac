//! # File Gateway
//!
//! The four request workflows (upload, list, download, delete) over an
//! injected object store and the access-code directory, plus serving of
//! objects behind signed URLs.
//!
//! Storing an object and registering its code are two separate steps: a
//! failed upload registers nothing, and nothing rolls back a stored object.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mime_guess::Mime;

use crate::directory::{AccessCode, Directory};
use crate::file_storage::{
    object_url, validate_object_name, SignedUrlGenerator, StorageBackend, StorageError,
    StoredObject,
};
use crate::observability::{Event, Logger};

use super::errors::{GatewayError, GatewayResult};

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub filename: String,
    pub url: String,
    pub access_code: AccessCode,
    pub content_type: String,
}

/// Time-limited retrieval link for one object
#[derive(Debug, Clone)]
pub struct DownloadLink {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Access-gated file gateway
#[derive(Debug)]
pub struct FileGateway {
    backend: Arc<dyn StorageBackend>,
    directory: Directory,
    signer: SignedUrlGenerator,
    public_base_url: String,
    hostname: String,
}

impl FileGateway {
    /// Create a gateway with an empty directory
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        signer: SignedUrlGenerator,
        public_base_url: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            directory: Directory::new(),
            signer,
            public_base_url: public_base_url.into(),
            hostname: hostname.into(),
        }
    }

    /// Name of the instance serving requests
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn bucket(&self) -> &str {
        self.backend.bucket()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Store `data` as `filename` and issue a fresh access code for it.
    ///
    /// Re-uploading a filename replaces both the object and its code.
    pub fn upload(
        &self,
        filename: &str,
        data: &[u8],
        declared_content_type: Option<&str>,
    ) -> GatewayResult<UploadReceipt> {
        let content_type = resolve_content_type(filename, declared_content_type);

        let result = if filename.is_empty() {
            Err(GatewayError::empty_filename())
        } else {
            validate_object_name(filename)
                .map_err(|e| GatewayError::Validation(e.to_string()))
                .and_then(|_| {
                    self.backend.put(filename, data, &content_type).map_err(|e| {
                        GatewayError::Storage(format!("Failed to upload file: {}", e))
                    })
                })
        };

        if let Err(e) = result {
            return Err(self.reject(Event::FileUploadFailed, Some(filename), e));
        }

        let access_code = AccessCode::generate();
        self.directory.register(filename, access_code.clone());

        let size = data.len().to_string();
        Logger::event(
            Event::FileUploaded,
            &[
                ("content_type", content_type.as_str()),
                ("filename", filename),
                ("hostname", self.hostname.as_str()),
                ("size", size.as_str()),
            ],
        );

        Ok(UploadReceipt {
            filename: filename.to_string(),
            url: object_url(&self.public_base_url, self.backend.bucket(), filename),
            access_code,
            content_type,
        })
    }

    /// Files currently registered under `code`
    pub fn list(&self, code: Option<&str>) -> GatewayResult<Vec<String>> {
        let code = match code {
            Some(code) if !code.is_empty() => code,
            _ => {
                return Err(self.reject(
                    Event::FileListRejected,
                    None,
                    GatewayError::missing_access_code(),
                ))
            }
        };

        let files = self.directory.query(code);

        let matches = files.len().to_string();
        Logger::event(
            Event::FilesListed,
            &[("hostname", self.hostname.as_str()), ("matches", matches.as_str())],
        );

        Ok(files)
    }

    /// Signed retrieval link for `filename`, valid for the signer's default expiry
    pub fn download_link(&self, filename: &str) -> GatewayResult<DownloadLink> {
        self.ensure_exists(filename, Event::DownloadNotFound)?;

        let signed = self
            .signer
            .generate(self.backend.bucket(), filename, None)
            .map_err(|e| GatewayError::Storage(e.to_string()))?;

        Logger::event(
            Event::DownloadUrlIssued,
            &[("filename", filename), ("hostname", self.hostname.as_str())],
        );

        Ok(DownloadLink {
            url: signed.to_url(&self.public_base_url),
            expires_at: signed.expires_at,
        })
    }

    /// Remove `filename` from the store, then forget its access code
    pub fn delete(&self, filename: &str) -> GatewayResult<()> {
        self.ensure_exists(filename, Event::FileDeleteNotFound)?;

        if let Err(e) = self.backend.delete(filename) {
            let err = GatewayError::Storage(format!("Failed to delete file: {}", e));
            return Err(self.reject(Event::FileDeleteFailed, Some(filename), err));
        }

        self.directory.unregister(filename);

        Logger::event(
            Event::FileDeleted,
            &[("filename", filename), ("hostname", self.hostname.as_str())],
        );
        Ok(())
    }

    /// Object presented with a valid signed URL
    pub fn fetch_signed(
        &self,
        bucket: &str,
        filename: &str,
        expires: i64,
        token: &str,
    ) -> GatewayResult<StoredObject> {
        if bucket != self.backend.bucket() {
            let err = GatewayError::NotFound(format!("{}/{}", bucket, filename));
            return Err(self.reject(Event::SignedObjectNotFound, Some(filename), err));
        }

        if let Err(e) = self.signer.verify(bucket, filename, expires, token) {
            let err = GatewayError::Forbidden(e.to_string());
            return Err(self.reject(Event::SignedUrlRejected, Some(filename), err));
        }

        let object = self.backend.get(filename).map_err(|e| match e {
            StorageError::ObjectNotFound(name) | StorageError::InvalidObjectName(name) => {
                self.reject(Event::SignedObjectNotFound, Some(filename), GatewayError::NotFound(name))
            }
            other => self.reject(
                Event::SignedObjectReadFailed,
                Some(filename),
                GatewayError::Storage(other.to_string()),
            ),
        })?;

        Logger::event(
            Event::SignedObjectServed,
            &[("filename", filename), ("hostname", self.hostname.as_str())],
        );
        Ok(object)
    }

    /// Log a failed request under `event` and hand the error back
    pub fn reject(&self, event: Event, filename: Option<&str>, err: GatewayError) -> GatewayError {
        let reason = match &err {
            GatewayError::NotFound(name) => format!("not found: {}", name),
            other => other.to_string(),
        };

        let mut fields = vec![("hostname", self.hostname.as_str()), ("reason", reason.as_str())];
        if let Some(filename) = filename {
            fields.push(("filename", filename));
        }
        Logger::event(event, &fields);

        err
    }

    /// Names that cannot be stored cannot exist, so they are not found
    fn ensure_exists(&self, filename: &str, not_found: Event) -> GatewayResult<()> {
        let exists = match validate_object_name(filename) {
            Err(_) => false,
            Ok(()) => self
                .backend
                .exists(filename)
                .map_err(|e| GatewayError::Storage(e.to_string()))?,
        };

        if exists {
            Ok(())
        } else {
            let err = GatewayError::NotFound(filename.to_string());
            Err(self.reject(not_found, Some(filename), err))
        }
    }
}

/// Content type kept with an upload.
///
/// A well-formed declared type wins. A missing, malformed or generic
/// `application/octet-stream` declaration falls back to a guess from the
/// filename extension.
pub fn resolve_content_type(filename: &str, declared: Option<&str>) -> String {
    let declared = declared
        .and_then(|t| t.trim().parse::<Mime>().ok())
        .filter(|m| *m != mime_guess::mime::APPLICATION_OCTET_STREAM);

    match declared {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::{MemoryBackend, StorageResult};

    fn gateway() -> FileGateway {
        FileGateway::new(
            Arc::new(MemoryBackend::new("test-bucket")),
            SignedUrlGenerator::new(b"test-secret"),
            "http://localhost:8083",
            "test-host",
        )
    }

    /// Backend whose deletes always fail
    #[derive(Debug)]
    struct StuckBackend(MemoryBackend);

    impl StorageBackend for StuckBackend {
        fn bucket(&self) -> &str {
            self.0.bucket()
        }
        fn put(&self, name: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
            self.0.put(name, data, content_type)
        }
        fn get(&self, name: &str) -> StorageResult<StoredObject> {
            self.0.get(name)
        }
        fn delete(&self, _name: &str) -> StorageResult<()> {
            Err(StorageError::IoError("permission denied".to_string()))
        }
        fn exists(&self, name: &str) -> StorageResult<bool> {
            self.0.exists(name)
        }
    }

    #[test]
    fn test_upload_registers_code() {
        let gw = gateway();
        let receipt = gw.upload("report.pdf", b"%PDF", None).unwrap();

        assert_eq!(receipt.access_code.as_str().len(), 5);
        assert_eq!(receipt.url, "http://localhost:8083/storage/test-bucket/report.pdf");
        assert_eq!(gw.list(Some(receipt.access_code.as_str())).unwrap(), vec!["report.pdf"]);
    }

    #[test]
    fn test_upload_rejects_bad_names() {
        let gw = gateway();
        assert!(matches!(gw.upload("", b"x", None), Err(GatewayError::Validation(m)) if m == "No selected file"));
        assert!(matches!(gw.upload("../etc", b"x", None), Err(GatewayError::Validation(_))));
        assert!(gw.directory().is_empty());
    }

    #[test]
    fn test_reupload_replaces_code() {
        let gw = gateway();
        let first = gw.upload("report.pdf", b"v1", None).unwrap();
        let second = gw.upload("report.pdf", b"v2", None).unwrap();

        assert_eq!(gw.directory().code_for("report.pdf"), Some(second.access_code.clone()));
        assert_eq!(gw.list(Some(second.access_code.as_str())).unwrap(), vec!["report.pdf"]);
        if first.access_code != second.access_code {
            assert!(gw.list(Some(first.access_code.as_str())).unwrap().is_empty());
        }
    }

    #[test]
    fn test_list_requires_code() {
        let gw = gateway();
        assert!(matches!(gw.list(None), Err(GatewayError::Validation(_))));
        assert!(matches!(gw.list(Some("")), Err(GatewayError::Validation(_))));
        assert!(gw.list(Some("00000")).unwrap().is_empty());
    }

    #[test]
    fn test_download_link() {
        let gw = gateway();
        gw.upload("notes.txt", b"hello", None).unwrap();

        let link = gw.download_link("notes.txt").unwrap();
        assert!(link.url.starts_with("http://localhost:8083/storage/test-bucket/notes.txt?expires="));

        assert!(matches!(gw.download_link("nonexistent.txt"), Err(GatewayError::NotFound(_))));
        assert!(matches!(gw.download_link(".."), Err(GatewayError::NotFound(_))));
    }

    #[test]
    fn test_delete_unregisters() {
        let gw = gateway();
        let receipt = gw.upload("report.pdf", b"%PDF", None).unwrap();

        gw.delete("report.pdf").unwrap();
        assert!(gw.list(Some(receipt.access_code.as_str())).unwrap().is_empty());
        assert!(matches!(gw.delete("report.pdf"), Err(GatewayError::NotFound(_))));
    }

    #[test]
    fn test_delete_failure_keeps_registration() {
        let gw = FileGateway::new(
            Arc::new(StuckBackend(MemoryBackend::new("b"))),
            SignedUrlGenerator::new(b"s"),
            "http://localhost",
            "h",
        );
        let receipt = gw.upload("keep.txt", b"x", None).unwrap();

        let err = gw.delete("keep.txt").unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Failed to delete file: "));
        assert_eq!(gw.list(Some(receipt.access_code.as_str())).unwrap(), vec!["keep.txt"]);
    }

    #[test]
    fn test_fetch_signed() {
        let gw = gateway();
        gw.upload("a.txt", b"alpha", None).unwrap();

        let signer = SignedUrlGenerator::new(b"test-secret");
        let signed = signer.generate("test-bucket", "a.txt", None).unwrap();
        let expires = signed.expires_at.timestamp();

        let object = gw.fetch_signed("test-bucket", "a.txt", expires, &signed.signature).unwrap();
        assert_eq!(object.data, b"alpha");
        assert_eq!(object.content_type, "text/plain");
        assert!(matches!(
            gw.fetch_signed("test-bucket", "a.txt", expires, "forged"),
            Err(GatewayError::Forbidden(_))
        ));
        assert!(matches!(
            gw.fetch_signed("other-bucket", "a.txt", expires, &signed.signature),
            Err(GatewayError::NotFound(_))
        ));
    }

    #[test]
    fn test_upload_keeps_declared_content_type() {
        let gw = gateway();

        let receipt = gw.upload("evil.html", b"<script>", Some("text/plain")).unwrap();
        assert_eq!(receipt.content_type, "text/plain");

        let receipt = gw.upload("photo.webp", b"RIFF", Some("image/webp")).unwrap();
        assert_eq!(receipt.content_type, "image/webp");
    }

    #[test]
    fn test_content_type_guessed_when_undeclared() {
        assert_eq!(resolve_content_type("report.pdf", None), "application/pdf");
        assert_eq!(
            resolve_content_type("report.pdf", Some("application/octet-stream")),
            "application/pdf"
        );
        assert_eq!(resolve_content_type("report.pdf", Some("not a type")), "application/pdf");
        assert_eq!(resolve_content_type("README", None), "application/octet-stream");
        assert_eq!(
            resolve_content_type("a.txt", Some("text/plain; charset=utf-8")),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_reject_returns_error_unchanged() {
        let gw = gateway();
        let err = gw.reject(
            Event::DownloadNotFound,
            Some("gone.txt"),
            GatewayError::NotFound("gone.txt".into()),
        );
        assert!(matches!(err, GatewayError::NotFound(name) if name == "gone.txt"));
    }
}
