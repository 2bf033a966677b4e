//! CLI module for albumwall.
//!
//! Offline helpers around the desktop app: album inspection, saved state,
//! configuration file management, schema and shell completions.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::AlbumwallError;

/// Parses command-line arguments and executes the command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), AlbumwallError> {
    let cli = Cli::parse();
    cli.execute()
}
