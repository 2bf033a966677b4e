//! In-memory fakes for the collaborator traits.
//!
//! Each fake is a cheap clone over shared state, so a test can hand one copy
//! to the code under test and keep another to script and inspect it.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::album::{AlbumSource, AlbumState, Collaborators, Gallery, GalleryError, OperationSet};
use crate::cache::ImagePaths;
use crate::dialogs::Dialogs;
use crate::dispatch::{DispatchHandle, QueueSettings};
use crate::platform::{Desktop, InputHandler};
use crate::state::{PersistedState, StateError, StateStore};

/// Gallery serving scripted albums. Downloads write the image id as the
/// file contents.
#[derive(Clone, Default)]
pub struct FakeGallery {
    albums: Arc<Mutex<HashMap<String, Vec<String>>>>,
    fail_downloads: Arc<AtomicBool>,
    downloaded: Arc<Mutex<Vec<String>>>,
}

impl FakeGallery {
    pub fn add_album(&self, album_id: &str, ids: &[&str]) {
        self.albums
            .lock()
            .insert(album_id.to_string(), ids.iter().map(|s| (*s).to_string()).collect());
    }

    pub fn fail_downloads(&self, fail: bool) { self.fail_downloads.store(fail, Ordering::SeqCst); }

    pub fn downloaded(&self) -> Vec<String> { self.downloaded.lock().clone() }
}

impl Gallery for FakeGallery {
    fn fetch_image_ids(&self, album: &AlbumSource) -> Result<Vec<String>, GalleryError> {
        self.albums.lock().get(album.id()).cloned().ok_or(GalleryError::Status(404))
    }

    fn fetch_image(&self, image_id: &str, dest: &Path) -> Result<PathBuf, GalleryError> {
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(GalleryError::Status(503));
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, image_id)?;
        self.downloaded.lock().push(image_id.to_string());
        Ok(dest.to_path_buf())
    }
}

/// Desktop that refuses selected paths and records exits instead of exiting.
#[derive(Clone, Default)]
pub struct FakeDesktop {
    rejected: Arc<Mutex<Vec<PathBuf>>>,
    applied: Arc<Mutex<Vec<PathBuf>>>,
    exits: Arc<Mutex<Vec<i32>>>,
}

impl FakeDesktop {
    pub fn reject(&self, path: &Path) { self.rejected.lock().push(path.to_path_buf()); }

    pub fn applied(&self) -> Vec<PathBuf> { self.applied.lock().clone() }

    pub fn exits(&self) -> Vec<i32> { self.exits.lock().clone() }
}

impl Desktop for FakeDesktop {
    fn name(&self) -> &'static str { "fake" }

    fn set_background(&self, path: &Path) -> bool {
        if self.rejected.lock().iter().any(|p| p == path) {
            return false;
        }
        self.applied.lock().push(path.to_path_buf());
        true
    }

    fn exit_process(&self, code: i32) { self.exits.lock().push(code); }

    fn run_input_loop(&self, _handler: &mut InputHandler<'_>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Error,
    Warning,
}

/// Dialogs answering from a script and recording what was shown.
#[derive(Clone, Default)]
pub struct FakeDialogs {
    answers: Arc<Mutex<VecDeque<Option<String>>>>,
    save_target: Arc<Mutex<Option<PathBuf>>>,
    messages: Arc<Mutex<Vec<(MessageLevel, String, String)>>>,
    prompt_defaults: Arc<Mutex<Vec<String>>>,
    save_prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeDialogs {
    /// Queues the next text prompt answer. An empty queue answers "cancel".
    pub fn answer(&self, answer: Option<&str>) { self.answers.lock().push_back(answer.map(str::to_string)); }

    pub fn set_save_target(&self, target: Option<PathBuf>) { *self.save_target.lock() = target; }

    pub fn messages(&self) -> Vec<(MessageLevel, String, String)> { self.messages.lock().clone() }

    pub fn titles(&self) -> Vec<String> {
        self.messages.lock().iter().map(|(_, title, _)| title.clone()).collect()
    }

    pub fn prompt_defaults(&self) -> Vec<String> { self.prompt_defaults.lock().clone() }

    pub fn save_prompts(&self) -> Vec<String> { self.save_prompts.lock().clone() }
}

impl Dialogs for FakeDialogs {
    fn prompt_save_as(&self, default_name: &str) -> Option<PathBuf> {
        self.save_prompts.lock().push(default_name.to_string());
        self.save_target.lock().clone()
    }

    fn prompt_string(&self, _title: &str, _message: &str, default: &str) -> Option<String> {
        self.prompt_defaults.lock().push(default.to_string());
        self.answers.lock().pop_front().flatten()
    }

    fn show_error(&self, title: &str, message: &str) {
        self.messages.lock().push((MessageLevel::Error, title.to_string(), message.to_string()));
    }

    fn show_warning(&self, title: &str, message: &str) {
        self.messages.lock().push((MessageLevel::Warning, title.to_string(), message.to_string()));
    }
}

/// State store kept in memory.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    saved: Arc<Mutex<Option<PersistedState>>>,
    fail: Arc<AtomicBool>,
}

impl MemoryStateStore {
    pub fn saved(&self) -> Option<PersistedState> { self.saved.lock().clone() }

    pub fn fail(&self, fail: bool) { self.fail.store(fail, Ordering::SeqCst); }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<PersistedState>, StateError> { Ok(self.saved()) }

    fn persist(&self, state: &PersistedState) -> Result<(), StateError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StateError::Io {
                path: PathBuf::from("memory"),
                source: std::io::Error::other("store unavailable"),
            });
        }
        *self.saved.lock() = Some(state.clone());
        Ok(())
    }
}

/// A full set of fakes plus a scratch image directory.
pub struct Harness {
    pub gallery: FakeGallery,
    pub desktop: FakeDesktop,
    pub dialogs: FakeDialogs,
    pub store: MemoryStateStore,
    pub handle: DispatchHandle,
    pub paths: ImagePaths,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self { Self::with_queue(QueueSettings::default()) }

    pub fn with_queue(settings: QueueSettings) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = ImagePaths::in_directory(&dir.path().join("images"));
        Self {
            gallery: FakeGallery::default(),
            desktop: FakeDesktop::default(),
            dialogs: FakeDialogs::default(),
            store: MemoryStateStore::default(),
            handle: DispatchHandle::new(settings),
            paths,
            dir,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            gallery: Box::new(self.gallery.clone()),
            desktop: Arc::new(self.desktop.clone()),
            dialogs: Box::new(self.dialogs.clone()),
            store: Box::new(self.store.clone()),
        }
    }

    pub fn operations(&self, album: AlbumState) -> OperationSet {
        OperationSet::new(album, self.paths.clone(), self.collaborators(), self.handle.clone())
    }
}
