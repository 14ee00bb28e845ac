//! # HTTP Server
//!
//! Builds the gateway from configuration and serves all routers on one
//! listener. The file directory lives inside the gateway, so it is created
//! with the server and dropped with it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use chrono::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::{GatewayConfig, MAX_SIGNED_URL_TTL_SECS};
use super::file_routes::file_routes;
use super::observability_routes::health_routes;
use super::storage_routes::storage_routes;
use crate::file_storage::{LocalBackend, SignedUrlGenerator, StorageBackend, StorageResult};
use crate::gateway::FileGateway;
use crate::observability::{resolve_hostname, Event, Logger};

/// HTTP server for the file gateway
pub struct HttpServer {
    config: GatewayConfig,
    gateway: Arc<FileGateway>,
    router: Router,
}

impl HttpServer {
    /// Create a server backed by the filesystem store named in `config`
    pub fn from_config(config: GatewayConfig) -> StorageResult<Self> {
        let backend = LocalBackend::open(&config.storage_root, config.bucket.clone())?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create a server over an explicit storage backend
    pub fn with_backend(config: GatewayConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let gateway = Arc::new(build_gateway(&config, backend));
        let router = Self::build_router(&config, gateway.clone());
        Self {
            config,
            gateway,
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &GatewayConfig, gateway: Arc<FileGateway>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes(gateway.clone()))
            .merge(file_routes(gateway.clone()))
            // Signed retrieval links point here
            .nest("/storage", storage_routes(gateway))
            .layer(
                ServiceBuilder::new()
                    .layer(cors)
                    .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Gateway shared by the handlers
    pub fn gateway(&self) -> Arc<FileGateway> {
        self.gateway.clone()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let addr_str = addr.to_string();
        Logger::event(
            Event::ServerStarting,
            &[
                ("addr", addr_str.as_str()),
                ("bucket", self.gateway.bucket()),
                ("hostname", self.gateway.hostname()),
                ("public_base_url", self.config.public_base_url.as_str()),
            ],
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Wire a gateway from configuration over `backend`
pub fn build_gateway(config: &GatewayConfig, backend: Arc<dyn StorageBackend>) -> FileGateway {
    let ttl = config.signed_url_ttl_secs.min(MAX_SIGNED_URL_TTL_SECS) as i64;
    let signer = SignedUrlGenerator::new(config.signing_secret.as_bytes())
        .with_default_expiry(Duration::seconds(ttl));

    FileGateway::new(
        backend,
        signer,
        config.public_base_url.clone(),
        resolve_hostname(config.instance_name.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::MemoryBackend;

    fn memory_server(config: GatewayConfig) -> HttpServer {
        let backend = Arc::new(MemoryBackend::new(config.bucket.clone()));
        HttpServer::with_backend(config, backend)
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = memory_server(GatewayConfig::with_port(8080));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_gateway_uses_config() {
        let config = GatewayConfig {
            instance_name: Some("vm-test".to_string()),
            bucket: "team-files".to_string(),
            ..Default::default()
        };
        let server = memory_server(config);

        assert_eq!(server.gateway().hostname(), "vm-test");
        assert_eq!(server.gateway().bucket(), "team-files");
    }

    #[test]
    fn test_from_config_creates_bucket_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = GatewayConfig {
            storage_root: temp.path().to_path_buf(),
            ..Default::default()
        };

        let _server = HttpServer::from_config(config).unwrap();
        assert!(temp.path().join("storify-cloud-files").is_dir());
    }

    #[test]
    fn test_router_builds() {
        let server = memory_server(GatewayConfig::default());
        let _router = server.router();
    }
}
