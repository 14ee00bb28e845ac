//! CLI module for Storify
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Run the HTTP gateway

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
