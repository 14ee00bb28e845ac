//! # Storify File Storage Module
//!
//! Object store collaborator used by the gateway: single-bucket backends and
//! signed retrieval URLs.

pub mod errors;
pub mod backend;
pub mod local;
pub mod memory;
pub mod signed_url;

pub use errors::{StorageError, StorageResult};
pub use backend::{validate_object_name, StorageBackend, StoredObject};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use signed_url::{object_url, SignedUrl, SignedUrlGenerator};
