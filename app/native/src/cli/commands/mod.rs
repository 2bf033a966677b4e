//! CLI command definitions using Clap.
//!
//! Commands are organized into domain-specific submodules:
//!
//! - `album` - Album inspection commands
//! - `config_cmd` - Configuration file commands
//! - `state` - Saved state commands

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::AlbumwallError;
use crate::{config, schema};

pub mod album;
pub mod config_cmd;
pub mod state;

pub use album::AlbumCommands;
pub use config_cmd::ConfigCommands;
pub use state::StateCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// albumwall - Rotate the desktop background through an Imgur album with
/// global hotkeys.
#[derive(Parser, Debug)]
#[command(name = "albumwall")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Album inspection commands.
    ///
    /// Validate album URLs and list the images an album contains.
    #[command(subcommand)]
    Album(AlbumCommands),

    /// Saved state commands.
    ///
    /// Inspect or rewind the album position kept between runs.
    #[command(subcommand)]
    State(StateCommands),

    /// Configuration file management commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(albumwall completions --shell zsh)"
    ///   albumwall completions --shell fish > ~/.config/fish/completions/albumwall.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Launch the desktop application.
    ///
    /// Equivalent to running `albumwall` without any arguments.
    #[command(name = "--desktop", hide = true)]
    Desktop,
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), AlbumwallError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(AlbumwallError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Album(cmd) => album::execute(cmd),
            Commands::State(cmd) => state::execute(cmd),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }

            Commands::Desktop => crate::app::run(),
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "albumwall", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["albumwall", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::try_parse_from(["albumwall", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parses_album_list_without_url() {
        let cli = Cli::try_parse_from(["albumwall", "album", "list"]).unwrap();
        match cli.command {
            Commands::Album(AlbumCommands::List { url, json }) => {
                assert!(url.is_none());
                assert!(!json);
            }
            _ => panic!("Expected Album List command"),
        }
    }

    #[test]
    fn test_cli_parses_album_list_with_url_json() {
        let cli = Cli::try_parse_from([
            "albumwall",
            "album",
            "list",
            "https://imgur.com/a/abc",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Album(AlbumCommands::List { url, json }) => {
                assert_eq!(url.as_deref(), Some("https://imgur.com/a/abc"));
                assert!(json);
            }
            _ => panic!("Expected Album List command"),
        }
    }

    #[test]
    fn test_cli_album_check_requires_url() {
        assert!(Cli::try_parse_from(["albumwall", "album", "check"]).is_err());

        let cli = Cli::try_parse_from(["albumwall", "album", "check", "https://imgur.com/a/x"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Album(AlbumCommands::Check { .. })));
    }

    #[test]
    fn test_cli_parses_state_commands() {
        let cli = Cli::try_parse_from(["albumwall", "state", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::State(StateCommands::Show)));

        let cli = Cli::try_parse_from(["albumwall", "state", "reset"]).unwrap();
        assert!(matches!(cli.command, Commands::State(StateCommands::Reset)));
    }

    #[test]
    fn test_cli_parses_config_init_flags() {
        let cli =
            Cli::try_parse_from(["albumwall", "config", "init", "--force", "--path", "/tmp/c.jsonc"])
                .unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init { force, path, stdout }) => {
                assert!(force);
                assert_eq!(path, Some(PathBuf::from("/tmp/c.jsonc")));
                assert!(!stdout);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_parses_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["albumwall", "schema", "--config", "/path/to/config.json"])
            .unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("/path/to/config.json")));
    }

    #[test]
    fn test_cli_parses_no_config_flag() {
        let cli = Cli::try_parse_from(["albumwall", "state", "show"]).unwrap();
        assert!(cli.config_path().is_none());
    }

    #[test]
    fn test_cli_execute_rejects_missing_config() {
        let cli = Cli::try_parse_from(["albumwall", "-c", "/definitely/not/here.jsonc", "schema"])
            .unwrap();
        assert!(matches!(cli.execute(), Err(AlbumwallError::ConfigError(_))));
    }
}
