//! # Storify HTTP Server Module
//!
//! Axum server exposing the file gateway.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /upload` - Multipart upload, returns an access code
//! - `POST /list` - Files registered under an access code
//! - `GET /download/{filename}` - Signed retrieval URL
//! - `DELETE /delete/{filename}` - Remove a file
//! - `GET /storage/{bucket}/{filename}` - Object bytes behind a signed URL

pub mod config;
pub mod server;
pub mod file_routes;
pub mod storage_routes;
pub mod observability_routes;

pub use config::GatewayConfig;
pub use server::{build_gateway, HttpServer};
