//! Storage HTTP Routes
//!
//! Serves object bytes behind signed retrieval URLs issued by `/download`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::gateway::{FileGateway, GatewayError};
use crate::observability::Event;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: i64,
    pub token: String,
}

/// Create storage routes
pub fn storage_routes(state: Arc<FileGateway>) -> Router {
    Router::new()
        .route("/:bucket/:filename", get(signed_object_handler))
        .with_state(state)
}

async fn signed_object_handler(
    State(gateway): State<Arc<FileGateway>>,
    Path((bucket, filename)): Path<(String, String)>,
    query: Result<Query<SignedQuery>, QueryRejection>,
) -> Result<(HeaderMap, Bytes), GatewayError> {
    let Query(signed) = query.map_err(|_| {
        gateway.reject(
            Event::SignedUrlRejected,
            Some(&filename),
            GatewayError::Forbidden("Missing or malformed signature".to_string()),
        )
    })?;

    let object = gateway.fetch_signed(&bucket, &filename, signed.expires, &signed.token)?;

    Ok((download_headers(&filename, &object.content_type), Bytes::from(object.data)))
}

/// Headers for serving stored bytes as a download, never rendered inline
fn download_headers(filename: &str, content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", ascii_filename(filename)))
            .unwrap_or(HeaderValue::from_static("attachment")),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers
}

/// Filename safe to quote in `Content-Disposition`
fn ascii_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
