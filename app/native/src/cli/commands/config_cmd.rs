//! Config CLI commands.
//!
//! Commands for managing the albumwall configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::config_paths;
use crate::config::template::{create_config_file, generate_config_template};
use crate::error::AlbumwallError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// All options are written commented out, showing their defaults.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  albumwall config init              # Create config at default location
  albumwall config init --force      # Overwrite existing config
  albumwall config init --path ~/wall.jsonc  # Create at custom path
  albumwall config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses the first search path.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration file search paths and which one is active.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), AlbumwallError> {
    match cmd {
        ConfigCommands::Init { stdout: true, .. } => {
            println!("{}", generate_config_template());
            Ok(())
        }
        ConfigCommands::Init { force, path, .. } => {
            let target = path
                .clone()
                .or_else(|| config_paths().into_iter().next())
                .unwrap_or_else(|| PathBuf::from("config.jsonc"));
            init_config(&target, *force)?;

            println!("Configuration file created at: {}", target.display());
            println!("\nAll options are commented out by default.");
            println!("Edit the file and uncomment the options you want to configure.");
            Ok(())
        }
        ConfigCommands::Path => {
            show_config_paths();
            Ok(())
        }
    }
}

/// Writes the template to `path`, refusing to overwrite unless `force`.
fn init_config(path: &Path, force: bool) -> Result<(), AlbumwallError> {
    if path.exists() && !force {
        return Err(AlbumwallError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            path.display()
        )));
    }

    create_config_file(path).map_err(|e| {
        AlbumwallError::ConfigError(format!("Failed to create config file {}: {e}", path.display()))
    })
}

fn show_config_paths() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let marker = match (path.exists(), found_config) {
            (true, false) => {
                found_config = true;
                " (active)"
            }
            (true, true) => " (exists)",
            (false, _) => "",
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'albumwall config init' to create one.");
    }
}
