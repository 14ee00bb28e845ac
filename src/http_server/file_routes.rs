//! File HTTP Routes
//!
//! Upload, list, download and delete endpoints of the gateway.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::gateway::{FileGateway, GatewayError};
use crate::observability::Event;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub url: String,
    pub access_code: String,
    pub content_type: String,
    pub hostname: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub files: Vec<String>,
    pub hostname: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub download_url: String,
    pub expires_at: String,
    pub hostname: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// File Routes
// ==================

/// Create file routes
pub fn file_routes(state: Arc<FileGateway>) -> Router {
    Router::new()
        .route("/upload", post(upload_handler))
        .route("/list", post(list_handler))
        .route("/download/:filename", get(download_handler))
        .route("/delete/:filename", delete(delete_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

/// Store the multipart field named `file` and issue an access code for it
async fn upload_handler(
    State(gateway): State<Arc<FileGateway>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, GatewayError> {
    let upload = read_file_part(multipart)
        .await
        .map_err(|e| gateway.reject(Event::FileUploadFailed, None, e))?;

    let receipt = gateway.upload(&upload.filename, &upload.data, upload.content_type.as_deref())?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        url: receipt.url,
        access_code: receipt.access_code.to_string(),
        content_type: receipt.content_type,
        hostname: gateway.hostname().to_string(),
    }))
}

/// The `file` part of an upload form
struct FilePart {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_file_part(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<FilePart, GatewayError> {
    let mut multipart = multipart.map_err(|_| GatewayError::missing_file_part())?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(GatewayError::empty_filename());
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(FilePart {
            filename,
            content_type,
            data,
        });
    }

    Err(GatewayError::missing_file_part())
}

/// Keep the 413 axum reports when the body limit is hit
fn multipart_error(err: MultipartError) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(err.body_text())
    } else {
        GatewayError::Validation(err.body_text())
    }
}

async fn list_handler(
    State(gateway): State<Arc<FileGateway>>,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> Result<Json<ListResponse>, GatewayError> {
    let Json(request) = payload.map_err(|e| {
        gateway.reject(Event::FileListRejected, None, GatewayError::Validation(e.body_text()))
    })?;

    let files = gateway.list(request.code.as_deref())?;

    Ok(Json(ListResponse {
        files,
        hostname: gateway.hostname().to_string(),
    }))
}

async fn download_handler(
    State(gateway): State<Arc<FileGateway>>,
    Path(filename): Path<String>,
) -> Result<Json<DownloadResponse>, GatewayError> {
    let link = gateway.download_link(&filename)?;

    Ok(Json(DownloadResponse {
        download_url: link.url,
        expires_at: link.expires_at.to_rfc3339(),
        hostname: gateway.hostname().to_string(),
    }))
}

async fn delete_handler(
    State(gateway): State<Arc<FileGateway>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, GatewayError> {
    gateway.delete(&filename)?;

    Ok(Json(MessageResponse {
        message: format!("File '{}' deleted successfully", filename),
    }))
}
