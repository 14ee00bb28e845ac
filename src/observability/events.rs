//! Observable gateway events
//!
//! Events are explicit and typed; each maps to a stable upper-case name.

use std::fmt;

use super::logger::Severity;

/// Events emitted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// HTTP server about to bind
    ServerStarting,

    // Workflows
    /// Object stored and access code issued
    FileUploaded,
    /// Upload rejected or failed
    FileUploadFailed,
    /// Directory queried by access code
    FilesListed,
    /// List request without a usable access code
    FileListRejected,
    /// Signed retrieval URL issued
    DownloadUrlIssued,
    /// Download link requested for an absent object
    DownloadNotFound,
    /// Object removed and unregistered
    FileDeleted,
    /// Delete requested for an absent object
    FileDeleteNotFound,
    /// Object store refused the delete
    FileDeleteFailed,
    /// Object served through a signed URL
    SignedObjectServed,
    /// Signed URL rejected
    SignedUrlRejected,
    /// Signed URL for an unknown bucket or object
    SignedObjectNotFound,
    /// Object store failed while serving a signed URL
    SignedObjectReadFailed,
}

impl Event {
    /// Stable event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStarting => "SERVER_STARTING",
            Event::FileUploaded => "FILE_UPLOADED",
            Event::FileUploadFailed => "FILE_UPLOAD_FAILED",
            Event::FilesListed => "FILES_LISTED",
            Event::FileListRejected => "FILE_LIST_REJECTED",
            Event::DownloadUrlIssued => "DOWNLOAD_URL_ISSUED",
            Event::DownloadNotFound => "DOWNLOAD_NOT_FOUND",
            Event::FileDeleted => "FILE_DELETED",
            Event::FileDeleteNotFound => "FILE_DELETE_NOT_FOUND",
            Event::FileDeleteFailed => "FILE_DELETE_FAILED",
            Event::SignedObjectServed => "SIGNED_OBJECT_SERVED",
            Event::SignedUrlRejected => "SIGNED_URL_REJECTED",
            Event::SignedObjectNotFound => "SIGNED_OBJECT_NOT_FOUND",
            Event::SignedObjectReadFailed => "SIGNED_OBJECT_READ_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FileDeleteFailed | Event::SignedObjectReadFailed => Severity::Error,
            Event::FileUploadFailed
            | Event::FileListRejected
            | Event::DownloadNotFound
            | Event::FileDeleteNotFound
            | Event::SignedUrlRejected
            | Event::SignedObjectNotFound => Severity::Warn,
            Event::ConfigLoaded
            | Event::ServerStarting
            | Event::FileUploaded
            | Event::FilesListed
            | Event::DownloadUrlIssued
            | Event::FileDeleted
            | Event::SignedObjectServed => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
