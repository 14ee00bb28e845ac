//! CLI command implementations

use std::fs;
use std::path::Path;

use crate::http_server::{GatewayConfig, HttpServer};
use crate::observability::{Event, Logger};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write a default configuration file; an existing file is never replaced
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let config = GatewayConfig::default();
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(config_path, json + "\n")?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Load configuration and run the gateway until the listener fails
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = GatewayConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let port_str = config.port.to_string();
    let path_str = config_path.display().to_string();
    Logger::event(
        Event::ConfigLoaded,
        &[
            ("bucket", config.bucket.as_str()),
            ("config", path_str.as_str()),
            ("port", port_str.as_str()),
        ],
    );

    let server = HttpServer::from_config(config)
        .map_err(|e| CliError::boot_failed(format!("Failed to open object store: {}", e)))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}
