//! CLI argument definitions using clap
//!
//! Commands:
//! - storify init --config <path>
//! - storify serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storify - access-code gated file gateway
#[derive(Parser, Debug)]
#[command(name = "storify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./storify.json")]
        config: PathBuf,
    },

    /// Start the HTTP gateway
    Serve {
        /// Path to configuration file (defaults apply when missing)
        #[arg(long, default_value = "./storify.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
