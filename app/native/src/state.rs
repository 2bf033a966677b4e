//! Persisted album state.
//!
//! The source URL and the rotation position survive restarts in a small JSON
//! file, `{"sourceUrl": "...", "position": 3}`, kept next to the user's other
//! application data.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State file name inside the application data directory.
const STATE_FILE_NAME: &str = "state.json";

/// Errors reading or writing the state file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub source_url: String,
    pub position: usize,
}

/// Storage for [`PersistedState`].
pub trait StateStore: Send {
    /// Loads the saved state, `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored state exists but cannot be read.
    fn load(&self) -> Result<Option<PersistedState>, StateError>;

    /// Saves `state`, replacing what was stored before.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn persist(&self, state: &PersistedState) -> Result<(), StateError>;
}

/// JSON file backed state store.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// Store at the default location, `<data dir>/albumwall/state.json`.
    #[must_use]
    pub fn at_default_location() -> Self { Self::new(default_state_path()) }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn io_error(&self, source: std::io::Error) -> StateError {
        StateError::Io { path: self.path.clone(), source }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<PersistedState>, StateError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_str(&contents).map(Some).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, state: &PersistedState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_string_pretty(state).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })?;

        // Replace atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))?;

        tracing::debug!(
            path = %self.path.display(),
            source_url = %state.source_url,
            position = state.position,
            "state persisted"
        );
        Ok(())
    }
}

/// Default state file location.
#[must_use]
pub fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::config_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("albumwall")
        .join(STATE_FILE_NAME)
}
