//! The operations behind each hotkey.
//!
//! [`OperationSet`] owns the album state and the background file and is only
//! ever driven by the dispatcher thread, one operation at a time. Every
//! failure is reported to the user here; the dispatcher only logs what comes
//! back.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::gallery::Gallery;
use super::position::{AlbumState, Rotation};
use super::source::AlbumSource;
use crate::cache::ImagePaths;
use crate::dialogs::Dialogs;
use crate::dispatch::{DispatchHandle, Execute, Operation};
use crate::error::OperationError;
use crate::platform::Desktop;
use crate::state::StateStore;

/// Suggested file name in the save dialog.
pub const SAVE_DEFAULT_FILE_NAME: &str = "cool_background.jpg";

/// Title of the album URL prompt.
pub const SOURCE_PROMPT_TITLE: &str = "Album URL Entry";

const SOURCE_PROMPT_MESSAGE: &str = "Enter the URL of the Imgur album to pull images from:";

/// Result of a rotation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The selected image is the background; the position moved.
    Applied { index: usize, position: usize },
    /// The selected image could not be applied and the default image is
    /// shown instead. The position did not move.
    FallbackApplied,
}

/// External services the operations use.
pub struct Collaborators {
    pub gallery: Box<dyn Gallery>,
    pub desktop: Arc<dyn Desktop>,
    pub dialogs: Box<dyn Dialogs>,
    pub store: Box<dyn StateStore>,
}

/// Album state plus everything needed to act on it.
pub struct OperationSet {
    album: AlbumState,
    paths: ImagePaths,
    gallery: Box<dyn Gallery>,
    desktop: Arc<dyn Desktop>,
    dialogs: Box<dyn Dialogs>,
    store: Box<dyn StateStore>,
    dispatch: DispatchHandle,
    rng: StdRng,
}

impl OperationSet {
    /// Creates the operation set. `dispatch` is used to request a queue reset
    /// after the source changes.
    #[must_use]
    pub fn new(
        album: AlbumState,
        paths: ImagePaths,
        collaborators: Collaborators,
        dispatch: DispatchHandle,
    ) -> Self {
        let Collaborators { gallery, desktop, dialogs, store } = collaborators;
        Self {
            album,
            paths,
            gallery,
            desktop,
            dialogs,
            store,
            dispatch,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Replaces the random source, for reproducible `random` rotations.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub const fn album(&self) -> &AlbumState { &self.album }

    #[must_use]
    pub const fn paths(&self) -> &ImagePaths { &self.paths }

    /// Runs one of `next`, `prev` or `random`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::EmptyAlbum`] without an album,
    /// [`OperationError::Fetch`] if the download failed and
    /// [`OperationError::Critical`] if neither the image nor the default
    /// image could be applied.
    pub fn rotate(&mut self, rotation: Rotation) -> Result<RotationOutcome, OperationError> {
        let index = match self.album.target_index(rotation, &mut self.rng) {
            Ok(index) => index,
            Err(err) => {
                self.dialogs.show_warning("Empty Album", "The album has no images!");
                return Err(err);
            }
        };

        let image_id = self.album.image_id(index).unwrap_or_default().to_string();
        tracing::debug!(?rotation, index, image = %image_id, "rotating background");

        let fetched = match self.gallery.fetch_image(&image_id, &self.paths.background) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(image = %image_id, error = %err, "image download failed");
                self.dialogs.show_error("Download Error", "Image download failed!");
                return Err(err.into());
            }
        };

        if self.desktop.set_background(&fetched) {
            self.album.commit(index);
            tracing::info!(
                image = %image_id,
                position = self.album.position(),
                total = self.album.len(),
                "background changed"
            );
            return Ok(RotationOutcome::Applied { index, position: self.album.position() });
        }

        tracing::warn!(image = %image_id, "could not apply image, falling back to default");
        let _ = fs::remove_file(&fetched);

        if self.desktop.set_background(&self.paths.default_image) {
            return Ok(RotationOutcome::FallbackApplied);
        }

        tracing::error!(
            image = %image_id,
            default_image = %self.paths.default_image.display(),
            "could not apply the fetched image or the default image"
        );
        self.dialogs.show_error(
            "Critical Failure",
            "Could not set the background image, nor the default image!",
        );
        Err(OperationError::Critical)
    }

    /// Copies the current background to a location the user picks.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Copy`] if the copy fails.
    pub fn save(&mut self) -> Result<Option<PathBuf>, OperationError> {
        if !self.paths.background.exists() {
            self.dialogs.show_warning("No File Exists", "There is no image to save!");
            return Ok(None);
        }

        let Some(destination) = self.dialogs.prompt_save_as(SAVE_DEFAULT_FILE_NAME) else {
            tracing::debug!("save cancelled");
            return Ok(None);
        };

        match fs::copy(&self.paths.background, &destination) {
            Ok(bytes) => {
                tracing::info!(path = %destination.display(), bytes, "background saved");
                Ok(Some(destination))
            }
            Err(err) => {
                tracing::warn!(path = %destination.display(), error = %err, "failed to save background");
                self.dialogs.show_error(
                    "Copy Failed",
                    &format!("Could not save the image to {}: {err}", destination.display()),
                );
                Err(OperationError::Copy(err))
            }
        }
    }

    /// Prompts for a new album URL and switches to it.
    ///
    /// Returns whether the source changed. A cancelled prompt leaves
    /// everything as it was.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::SourceReload`] if the new album cannot be
    /// loaded or is empty. The process has been asked to exit by then.
    pub fn change_source(&mut self) -> Result<bool, OperationError> {
        let Some(source) = self.prompt_source() else {
            tracing::debug!("source change cancelled");
            return Ok(false);
        };

        tracing::info!(url = %source, album = %source.id(), "switching album source");
        self.album.switch_source(source.url());

        if let Err(err) = self.persist() {
            tracing::warn!(error = %err, "failed to persist new source");
            self.dialogs.show_warning(
                "Save Failed",
                &format!("The new album will not be remembered after a restart: {err}"),
            );
        }

        let reason = match self.gallery.fetch_image_ids(&source) {
            Ok(ids) if !ids.is_empty() => {
                self.album.set_image_ids(ids);
                self.dispatch.request_reset();
                return Ok(true);
            }
            Ok(_) => "the album has no images".to_string(),
            Err(err) => err.to_string(),
        };

        tracing::error!(url = %source, %reason, "failed to load new album");
        self.dialogs.show_error(
            "Critical Failure",
            &format!("Could not load the album at {source}: {reason}"),
        );
        self.desktop.exit_process(1);
        Err(OperationError::SourceReload(reason))
    }

    /// Validate-and-retry prompt loop. `None` when cancelled.
    fn prompt_source(&self) -> Option<AlbumSource> {
        let mut default = self.album.source_url().to_string();
        loop {
            let input =
                self.dialogs.prompt_string(SOURCE_PROMPT_TITLE, SOURCE_PROMPT_MESSAGE, &default)?;

            match AlbumSource::parse(&input) {
                Ok(source) => return Some(source),
                Err(err) => {
                    tracing::debug!(error = %err, "rejected album URL");
                    self.dialogs.show_error(
                        "Invalid URL",
                        "That is not a valid Imgur album URL, please try again.",
                    );
                    default = input;
                }
            }
        }
    }

    /// Writes the source URL and position to the state store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Persist`] if the store cannot be written.
    pub fn persist(&self) -> Result<(), OperationError> {
        self.store.persist(&self.album.persisted())?;
        Ok(())
    }
}

impl Execute for OperationSet {
    fn execute(&mut self, operation: Operation) -> Result<(), OperationError> {
        match operation {
            Operation::Next => self.rotate(Rotation::Next).map(drop),
            Operation::Prev => self.rotate(Rotation::Prev).map(drop),
            Operation::Random => self.rotate(Rotation::Random).map(drop),
            Operation::Save => self.save().map(drop),
            Operation::ChangeSource => self.change_source().map(drop),
            Operation::Quit => {
                self.shutdown();
                Ok(())
            }
        }
    }

    fn shutdown(&mut self) {
        if let Err(err) = self.persist() {
            tracing::error!(error = %err, "failed to persist state");
        }
        tracing::info!(
            source_url = %self.album.source_url(),
            position = self.album.position(),
            "state saved, exiting"
        );
        self.desktop.exit_process(0);
    }
}
