//! Error types for Albumwall.
//!
//! [`AlbumwallError`] is the top-level error returned by CLI commands and the
//! startup path. [`OperationError`] is what a dispatched operation reports
//! back to the dispatcher after it has already told the user.

use serde::Serialize;
use thiserror::Error;

use crate::album::GalleryError;
use crate::state::StateError;

/// Errors that can occur during application execution.
///
/// Serializes as `{"kind": ..., "message": ...}` so CLI commands can print
/// failures as JSON.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AlbumwallError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// The album URL is not a recognised gallery URL.
    #[error("Invalid album URL: {0}")]
    InvalidSource(String),
    /// Talking to the image host failed.
    #[error("Gallery error: {0}")]
    GalleryError(String),
    /// Reading or writing persisted state failed.
    #[error("State error: {0}")]
    StateError(String),
    /// Global hotkey registration failed.
    #[error("Hotkey error: {0}")]
    HotkeyError(String),
    /// The desktop integration could not be started.
    #[error("Platform error: {0}")]
    PlatformError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for AlbumwallError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for AlbumwallError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<GalleryError> for AlbumwallError {
    fn from(err: GalleryError) -> Self { Self::GalleryError(err.to_string()) }
}

impl From<StateError> for AlbumwallError {
    fn from(err: StateError) -> Self { Self::StateError(err.to_string()) }
}

/// Failure of a dispatched operation.
///
/// Every variant has already been reported to the user through the dialog
/// collaborator by the time the dispatcher sees it.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The image could not be downloaded. State is unchanged.
    #[error("image download failed: {0}")]
    Fetch(#[from] GalleryError),
    /// Neither the fetched image nor the default image could be applied.
    #[error("could not set the fetched image or the default image")]
    Critical,
    /// The image list for a new source could not be loaded.
    #[error("failed to reload album: {0}")]
    SourceReload(String),
    /// Copying the current background to the chosen destination failed.
    #[error("failed to copy background: {0}")]
    Copy(#[source] std::io::Error),
    /// The album holds no images.
    #[error("album has no images")]
    EmptyAlbum,
    /// Writing persisted state failed.
    #[error("failed to persist state: {0}")]
    Persist(#[from] StateError),
    /// The entered album URL is not valid.
    #[error("invalid album URL: {0}")]
    InvalidSource(String),
}

impl OperationError {
    /// Whether the process cannot continue after this failure.
    #[must_use]
    pub const fn is_fatal(&self) -> bool { matches!(self, Self::SourceReload(_)) }
}
