//! Gateway Configuration
//!
//! JSON configuration for the HTTP gateway. Every field has a default, so an
//! empty object (or a missing file) yields a runnable local setup.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::cli::{CliError, CliResult};

/// Longest accepted signed URL lifetime (7 days)
pub const MAX_SIGNED_URL_TTL_SECS: u64 = 7 * 24 * 3600;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8083)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Bucket all objects are stored in
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Root directory of the filesystem object store
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// Base URL clients use to reach this gateway
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Secret for signing retrieval URLs (random per process when unset)
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,

    /// Lifetime of signed retrieval URLs in seconds (default: 1 hour)
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u64,

    /// Maximum accepted request body for uploads (default: 100MB)
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,

    /// Name reported as `hostname`; resolved from the host when unset
    #[serde(default)]
    pub instance_name: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

fn default_bucket() -> String {
    "storify-cloud-files".to_string()
}

fn default_storage_root() -> PathBuf {
    std::env::temp_dir().join("storify_storage")
}

fn default_public_base_url() -> String {
    "http://localhost:8083".to_string()
}

fn default_signing_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn default_signed_url_ttl() -> u64 {
    3600
}

fn default_max_upload() -> usize {
    100 * 1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            bucket: default_bucket(),
            storage_root: default_storage_root(),
            public_base_url: default_public_base_url(),
            signing_secret: default_signing_secret(),
            signed_url_ttl_secs: default_signed_url_ttl(),
            max_upload_bytes: default_max_upload(),
            instance_name: None,
        }
    }
}

impl GatewayConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load configuration from file; a missing file yields the defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: GatewayConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Reject settings the gateway cannot run with
    pub fn validate(&self) -> CliResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(CliError::config_error("bucket must not be empty"));
        }

        if self.bucket.contains('/') || self.bucket.contains('\\') {
            return Err(CliError::config_error(format!(
                "Invalid bucket: '{}'. Bucket names cannot contain path separators.",
                self.bucket
            )));
        }

        if self.signing_secret.is_empty() {
            return Err(CliError::config_error("signing_secret must not be empty"));
        }

        if self.signed_url_ttl_secs == 0 || self.signed_url_ttl_secs > MAX_SIGNED_URL_TTL_SECS {
            return Err(CliError::config_error(format!(
                "signed_url_ttl_secs must be between 1 and {}",
                MAX_SIGNED_URL_TTL_SECS
            )));
        }

        if self.max_upload_bytes == 0 {
            return Err(CliError::config_error("max_upload_bytes must be > 0"));
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8083);
        assert_eq!(config.bucket, "storify-cloud-files");
        assert_eq!(config.signed_url_ttl_secs, 3600);
        assert!(!config.signing_secret.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = GatewayConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = GatewayConfig::load(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config.port, 8083);
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("storify.json");
        fs::write(&path, r#"{"port": 9000, "bucket": "team-files", "instance_name": "vm-a"}"#).unwrap();

        let config = GatewayConfig::load(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bucket, "team-files");
        assert_eq!(config.instance_name.as_deref(), Some("vm-a"));
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_load_rejects_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");

        fs::write(&path, r#"{"signed_url_ttl_secs": 0}"#).unwrap();
        assert!(GatewayConfig::load(&path).is_err());

        fs::write(&path, r#"{"signed_url_ttl_secs": 604801}"#).unwrap();
        assert!(GatewayConfig::load(&path).is_err());

        fs::write(&path, r#"{"bucket": "a/b"}"#).unwrap();
        assert!(GatewayConfig::load(&path).is_err());

        fs::write(&path, "not json").unwrap();
        assert!(GatewayConfig::load(&path).is_err());
    }
}
