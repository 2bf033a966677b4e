//! Configuration module for albumwall.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    AlbumConfig, AlbumwallConfig, ConfigError, DEFAULT_ALBUM_URL, ImagesConfig, KeybindingsConfig,
    LoggingConfig, NetworkConfig, QueueConfig, config_paths, load_config as load_config_default,
    load_config_from_path,
};

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<AlbumwallConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before `get_config()` to take effect.
///
/// Returns `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from disk.
///
/// Falls back to defaults if loading fails. If no configuration file
/// exists, a template is written to the preferred location.
fn load_or_default() -> AlbumwallConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "configuration loaded");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            create_default_config_file();
            AlbumwallConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            AlbumwallConfig::default()
        }
    }
}

/// Creates a template configuration file at the default location.
fn create_default_config_file() {
    let target = CUSTOM_CONFIG_PATH.get().cloned().or_else(|| config_paths().into_iter().next());
    let Some(config_path) = target else {
        tracing::debug!("no config path available for creating template");
        return;
    };

    if config_path.exists() {
        return;
    }

    match template::create_config_file(&config_path) {
        Ok(()) => {
            let _ = CONFIG_PATH.set(config_path.clone());
            tracing::info!(path = %config_path.display(), "created default configuration file");
        }
        Err(err) => {
            tracing::debug!(
                error = %err,
                path = %config_path.display(),
                "failed to create default configuration file"
            );
        }
    }
}

/// Returns the global configuration instance, loading it on first use.
pub fn get_config() -> &'static AlbumwallConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

/// Directory relative config paths are resolved against.
///
/// This is the loaded file's directory, or the current directory when no
/// file was loaded.
#[must_use]
pub fn config_base_dir() -> PathBuf {
    get_config_path()
        .and_then(|path| path.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}
