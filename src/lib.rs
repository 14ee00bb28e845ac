//! storify - an access-code gated HTTP gateway for files in an object store
//!
//! Uploaded files are stored in a single bucket and registered under a
//! randomly generated 5-digit access code. Anyone holding the code can list
//! the files registered under it and request time-limited download links.

pub mod cli;
pub mod directory;
pub mod file_storage;
pub mod gateway;
pub mod http_server;
pub mod observability;
