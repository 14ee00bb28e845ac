//! Observability HTTP Routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::gateway::FileGateway;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub hostname: String,
}

/// Health check route
pub fn health_routes(state: Arc<FileGateway>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(gateway): State<Arc<FileGateway>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: gateway.hostname().to_string(),
    };

    (StatusCode::OK, Json(response))
}
