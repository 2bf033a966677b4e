//! Configuration types for albumwall.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::{DEFAULT_CAPACITY, DEFAULT_SUBMIT_TIMEOUT, Operation, QueueSettings};

/// Album shown when neither the configuration nor the saved state name one.
pub const DEFAULT_ALBUM_URL: &str = "https://imgur.com/gallery/wCBYO";

/// Default HTTP timeout for the image host, in seconds.
const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure for albumwall.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AlbumwallConfig {
    /// Album the images are taken from on first start.
    pub album: AlbumConfig,

    /// Command queue tuning.
    pub queue: QueueConfig,

    /// Where the downloaded background and the fallback image live.
    pub images: ImagesConfig,

    /// Image host connection settings.
    pub network: NetworkConfig,

    /// Global hotkeys for each operation.
    pub keybindings: KeybindingsConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Album source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AlbumConfig {
    /// Imgur album or gallery URL, e.g. `https://imgur.com/a/abc123`.
    ///
    /// Only used until a source has been chosen with the change-source
    /// hotkey; after that the saved state wins.
    pub url: String,
}

impl Default for AlbumConfig {
    fn default() -> Self { Self { url: DEFAULT_ALBUM_URL.to_string() } }
}

/// Command queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct QueueConfig {
    /// Maximum number of pending commands. Zero is treated as one.
    pub capacity: usize,

    /// How long a hotkey press waits for queue space before it is dropped,
    /// in milliseconds.
    pub submit_timeout_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            submit_timeout_ms: u64::try_from(DEFAULT_SUBMIT_TIMEOUT.as_millis()).unwrap_or(100),
        }
    }
}

impl QueueConfig {
    /// Queue settings with the capacity normalized to at least one.
    #[must_use]
    pub fn settings(&self) -> QueueSettings {
        QueueSettings {
            capacity: self.capacity.max(1),
            submit_timeout: Duration::from_millis(self.submit_timeout_ms),
        }
    }
}

/// Image file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ImagesConfig {
    /// Directory for the downloaded background. Empty means the platform
    /// cache directory. Supports `~` and environment variables.
    pub directory: String,

    /// Image applied when a downloaded one cannot be set. Empty means a
    /// generated plain image.
    pub default_image: String,
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Timeout for each request to the image host, in seconds.
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self { Self { timeout_secs: DEFAULT_NETWORK_TIMEOUT_SECS } }
}

impl NetworkConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

/// Hotkey chords, one per operation.
///
/// Chords are written as `Modifier+Key` (e.g. `"Alt+D"`, `"Ctrl+Shift+S"`).
/// An empty string disables the operation's hotkey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct KeybindingsConfig {
    pub next: String,
    pub prev: String,
    pub random: String,
    pub save: String,
    pub change_source: String,
    pub quit: String,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            next: "Alt+D".to_string(),
            prev: "Alt+A".to_string(),
            random: "Alt+R".to_string(),
            save: "Alt+S".to_string(),
            change_source: "Alt+U".to_string(),
            quit: "Alt+Q".to_string(),
        }
    }
}

impl KeybindingsConfig {
    /// Every operation paired with its chord, in a fixed order.
    #[must_use]
    pub fn bindings(&self) -> Vec<(Operation, &str)> {
        vec![
            (Operation::Next, self.next.as_str()),
            (Operation::Prev, self.prev.as_str()),
            (Operation::Random, self.random.as_str()),
            (Operation::Save, self.save.as_str()),
            (Operation::ChangeSource, self.change_source.as_str()),
            (Operation::Quit, self.quit.as_str()),
        ]
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Enables debug output and honours `RUST_LOG`.
    pub debug: bool,

    /// Log file path. Empty logs to stderr. The file is truncated on start.
    pub file: String,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/albumwall/config.jsonc, \
        the platform config directory, or ~/.albumwall.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".albumwall.jsonc", ".albumwall.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/albumwall/`, when set
/// 2. `~/.config/albumwall/`
/// 3. the platform config directory (`%APPDATA%\albumwall` on Windows)
/// 4. `~/.albumwall.jsonc` or `~/.albumwall.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let app_dir = PathBuf::from(xdg_config).join("albumwall");
        for filename in CONFIG_FILE_NAMES {
            paths.push(app_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let app_dir = home.join(".config").join("albumwall");
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            // XDG_CONFIG_HOME might be ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("albumwall");
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(AlbumwallConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, or an I/O or
/// parse error if it cannot be read.
pub fn load_config_from_path(path: &Path) -> Result<(AlbumwallConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: AlbumwallConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}
