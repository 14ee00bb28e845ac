//! # Gateway Workflows
//!
//! Request-level operations tying the object store to the access-code
//! directory. HTTP routing lives in `http_server`.

pub mod errors;
pub mod service;

pub use errors::{ErrorResponse, GatewayError, GatewayResult};
pub use service::{DownloadLink, FileGateway, UploadReceipt};
