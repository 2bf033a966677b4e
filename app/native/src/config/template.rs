//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// Uncommenting any block yields valid JSONC with the default values.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// albumwall Configuration File
// =============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Album
  // ============================================================================
  // Used on first start. Once a source is picked with the change-source
  // hotkey, the saved state takes precedence.
  // "album": {
  //   // Imgur album or gallery URL
  //   "url": "https://imgur.com/gallery/wCBYO"
  // },

  // ============================================================================
  // Command Queue
  // ============================================================================
  // "queue": {
  //   // Maximum number of pending hotkey commands (0 is treated as 1)
  //   "capacity": 200,
  //
  //   // Milliseconds a hotkey press waits for queue space before it is dropped
  //   "submitTimeoutMs": 100
  // },

  // ============================================================================
  // Images
  // ============================================================================
  // "images": {
  //   // Directory for the downloaded background (empty = platform cache dir)
  //   "directory": "",
  //
  //   // Image applied when a downloaded one cannot be set
  //   // (empty = a generated plain image)
  //   "defaultImage": ""
  // },

  // ============================================================================
  // Network
  // ============================================================================
  // "network": {
  //   // Request timeout in seconds
  //   "timeoutSecs": 30
  // },

  // ============================================================================
  // Keybindings
  // ============================================================================
  // Modifiers: Alt (Opt), Ctrl, Shift, Super (Cmd/Win). Empty disables a key.
  // "keybindings": {
  //   "next": "Alt+D",
  //   "prev": "Alt+A",
  //   "random": "Alt+R",
  //   "save": "Alt+S",
  //   "changeSource": "Alt+U",
  //   "quit": "Alt+Q"
  // },

  // ============================================================================
  // Logging
  // ============================================================================
  // "logging": {
  //   // Enable debug output (RUST_LOG is honoured when set)
  //   "debug": false,
  //
  //   // Log file, truncated on start (empty = stderr)
  //   "file": ""
  // }
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlbumwallConfig;

    #[test]
    fn test_generate_config_template_contains_all_sections() {
        let template = generate_config_template();
        for section in ["album", "queue", "images", "network", "keybindings", "logging"] {
            assert!(template.contains(&format!("\"{section}\"")), "missing {section}");
        }
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let template = generate_config_template();
        let reader = json_comments::StripComments::new(template.as_bytes());
        let config: AlbumwallConfig = serde_json::from_reader(reader).unwrap();

        assert_eq!(config.album, AlbumwallConfig::default().album);
        assert_eq!(config.keybindings, AlbumwallConfig::default().keybindings);
    }

    #[test]
    fn test_create_config_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        create_config_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), generate_config_template());
    }
}
