//! Desktop application startup.
//!
//! Wires the configuration, persisted state, gallery, dispatcher and global
//! hotkeys together, then runs the platform input loop on the main thread
//! until the dispatcher stops.

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::album::{AlbumSource, AlbumState, Collaborators, Gallery, ImgurGallery, OperationSet};
use crate::cache::ImagePaths;
use crate::config::{self, AlbumwallConfig};
use crate::dialogs::{Dialogs, NativeDialogs};
use crate::dispatch::{DispatchHandle, Dispatcher, Shutdown};
use crate::error::AlbumwallError;
use crate::hotkey::HotkeyListener;
use crate::logging;
use crate::platform::{self, Desktop};
use crate::state::{FileStateStore, PersistedState, StateStore};

/// Title of the alert shown when startup cannot continue.
const FATAL_TITLE: &str = "Critical Failure";

/// Runs the desktop application until quit.
///
/// # Errors
///
/// Returns an error if the album cannot be loaded, no hotkey can be
/// registered, or the dispatcher stops on a fatal failure. The user has been
/// alerted in each case.
pub fn run() -> Result<(), AlbumwallError> {
    let config = config::get_config();
    logging::init(&config.logging);

    let desktop = platform::current();
    tracing::info!(
        platform = desktop.name(),
        config = ?config::get_config_path(),
        "albumwall starting"
    );

    match start(config, &desktop) {
        Ok(Shutdown::Quit) => Ok(()),
        // The failing operation has already alerted the user.
        Ok(Shutdown::Fatal(reason)) => {
            desktop.exit_process(1);
            Err(AlbumwallError::GalleryError(reason))
        }
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            NativeDialogs.show_error(FATAL_TITLE, &err.to_string());
            desktop.exit_process(1);
            Err(err)
        }
    }
}

fn start(config: &AlbumwallConfig, desktop: &Arc<dyn Desktop>) -> Result<Shutdown, AlbumwallError> {
    let paths = ImagePaths::from_config(&config.images, &config::config_base_dir());
    if let Err(err) = paths.prepare() {
        tracing::warn!(error = %err, "failed to prepare image directory");
    }

    let store = FileStateStore::at_default_location();
    let saved = match store.load() {
        Ok(saved) => saved,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable saved state");
            None
        }
    };

    let (source, position) = resolve_source(saved.as_ref(), &config.album.url)?;
    let gallery = ImgurGallery::new(config.network.timeout())?;
    let album = load_album(&gallery, &source, position)?;

    let handle = DispatchHandle::new(config.queue.settings());
    let operations = OperationSet::new(
        album,
        paths,
        Collaborators {
            gallery: Box::new(gallery),
            desktop: Arc::clone(desktop),
            dialogs: Box::new(NativeDialogs),
            store: Box::new(store),
        },
        handle.clone(),
    );

    let dispatcher = Dispatcher::new(&handle, operations)
        .spawn()
        .ok_or_else(|| AlbumwallError::PlatformError("failed to start dispatcher".to_string()))?;

    // The hotkey manager must live on the thread running the input loop.
    let listener = HotkeyListener::register(&config.keybindings, handle)
        .map_err(|err| AlbumwallError::HotkeyError(err.to_string()))?;

    tracing::info!("ready");
    desktop.run_input_loop(&mut |wait| {
        listener.poll(wait);
        if dispatcher.is_finished() { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    });

    dispatcher
        .join()
        .map_err(|_| AlbumwallError::PlatformError("dispatcher thread panicked".to_string()))
}

/// Picks the album to start with and the saved position within it.
///
/// A valid saved source wins over the configured one. An invalid saved URL
/// is ignored with a warning.
///
/// # Errors
///
/// Returns [`AlbumwallError::InvalidSource`] if neither URL is usable.
pub fn resolve_source(
    saved: Option<&PersistedState>,
    config_url: &str,
) -> Result<(AlbumSource, usize), AlbumwallError> {
    if let Some(saved) = saved {
        match AlbumSource::parse(&saved.source_url) {
            Ok(source) => return Ok((source, saved.position)),
            Err(err) => {
                tracing::warn!(url = %saved.source_url, error = %err, "saved album URL is invalid, using configured album");
            }
        }
    }

    AlbumSource::parse(config_url)
        .map(|source| (source, 0))
        .map_err(|_| AlbumwallError::InvalidSource(config_url.to_string()))
}

/// Fetches the album's image list and builds the starting state.
///
/// # Errors
///
/// Returns an error if the list cannot be fetched or is empty.
pub fn load_album(
    gallery: &dyn Gallery,
    source: &AlbumSource,
    position: usize,
) -> Result<AlbumState, AlbumwallError> {
    let ids = gallery.fetch_image_ids(source)?;
    if ids.is_empty() {
        return Err(AlbumwallError::GalleryError(format!("album {source} has no images")));
    }

    tracing::info!(url = %source, images = ids.len(), position, "album loaded");
    Ok(AlbumState::new(source.url(), ids, position))
}
