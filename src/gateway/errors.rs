//! # Gateway Errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type for gateway workflows
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced to HTTP callers
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Required input missing or unusable
    #[error("{0}")]
    Validation(String),

    /// Object absent from the store
    #[error("File not found")]
    NotFound(String),

    /// Signed URL rejected
    #[error("{0}")]
    Forbidden(String),

    /// Request body over the configured upload limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Object store call failed
    #[error("{0}")]
    Storage(String),
}

impl GatewayError {
    pub fn missing_file_part() -> Self {
        Self::Validation("No file part".to_string())
    }

    pub fn empty_filename() -> Self {
        Self::Validation("No selected file".to_string())
    }

    pub fn missing_access_code() -> Self {
        Self::Validation("No access code provided".to_string())
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::Forbidden(_) => 403,
            GatewayError::NotFound(_) => 404,
            GatewayError::PayloadTooLarge(_) => 413,
            GatewayError::Storage(_) => 500,
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::missing_file_part().status_code(), 400);
        assert_eq!(GatewayError::NotFound("a".into()).status_code(), 404);
        assert_eq!(GatewayError::Forbidden("URL expired".into()).status_code(), 403);
        assert_eq!(GatewayError::PayloadTooLarge("too big".into()).status_code(), 413);
        assert_eq!(GatewayError::Storage("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_not_found_message_hides_name() {
        let err = GatewayError::NotFound("secret-plans.pdf".into());
        assert_eq!(err.to_string(), "File not found");
    }

    #[test]
    fn test_into_response_status() {
        let response = GatewayError::missing_access_code().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
