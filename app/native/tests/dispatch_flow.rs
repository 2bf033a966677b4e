//! End-to-end dispatch tests.
//!
//! These drive a real dispatcher thread through the public API, with
//! in-memory stand-ins for the image host, the desktop, dialogs and the
//! state file.
//!
//! ```bash
//! cargo test -p albumwall --test dispatch_flow
//! ```

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use albumwall_lib::album::{
    AlbumSource, AlbumState, Collaborators, Gallery, GalleryError, OperationSet,
};
use albumwall_lib::cache::ImagePaths;
use albumwall_lib::dialogs::Dialogs;
use albumwall_lib::dispatch::{
    DispatchHandle, Dispatcher, Execute, Operation, Priority, QueueSettings, Rejected, Shutdown,
};
use albumwall_lib::error::OperationError;
use albumwall_lib::platform::{Desktop, InputHandler};
use albumwall_lib::state::{PersistedState, StateError, StateStore};
use parking_lot::Mutex;

// ============================================================================
// Stand-ins
// ============================================================================

/// Serves `first` and `second` albums; downloads write the image id.
struct TwoAlbums;

impl Gallery for TwoAlbums {
    fn fetch_image_ids(&self, album: &AlbumSource) -> Result<Vec<String>, GalleryError> {
        match album.id() {
            "first" => Ok(vec!["a".into(), "b".into(), "c".into()]),
            "second" => Ok(vec!["x".into(), "y".into()]),
            _ => Err(GalleryError::Status(404)),
        }
    }

    fn fetch_image(&self, image_id: &str, dest: &Path) -> Result<PathBuf, GalleryError> {
        fs::write(dest, image_id)?;
        Ok(dest.to_path_buf())
    }
}

/// Records the contents of every applied background and every exit code.
#[derive(Clone, Default)]
struct RecordingDesktop {
    shown: Arc<Mutex<Vec<String>>>,
    exits: Arc<Mutex<Vec<i32>>>,
}

impl Desktop for RecordingDesktop {
    fn name(&self) -> &'static str { "recording" }

    fn set_background(&self, path: &Path) -> bool {
        let contents = fs::read_to_string(path).unwrap_or_default();
        self.shown.lock().push(contents);
        true
    }

    fn exit_process(&self, code: i32) { self.exits.lock().push(code); }

    fn run_input_loop(&self, _handler: &mut InputHandler<'_>) {}
}

/// Answers text prompts from a script; everything else is cancelled.
#[derive(Clone, Default)]
struct ScriptedDialogs {
    answers: Arc<Mutex<VecDeque<String>>>,
}

impl Dialogs for ScriptedDialogs {
    fn prompt_save_as(&self, _default_name: &str) -> Option<PathBuf> { None }

    fn prompt_string(&self, _title: &str, _message: &str, _default: &str) -> Option<String> {
        self.answers.lock().pop_front()
    }

    fn show_error(&self, _title: &str, _message: &str) {}

    fn show_warning(&self, _title: &str, _message: &str) {}
}

#[derive(Clone, Default)]
struct SharedStore {
    saved: Arc<Mutex<Option<PersistedState>>>,
}

impl StateStore for SharedStore {
    fn load(&self) -> Result<Option<PersistedState>, StateError> { Ok(self.saved.lock().clone()) }

    fn persist(&self, state: &PersistedState) -> Result<(), StateError> {
        *self.saved.lock() = Some(state.clone());
        Ok(())
    }
}

struct Fixture {
    desktop: RecordingDesktop,
    dialogs: ScriptedDialogs,
    store: SharedStore,
    handle: DispatchHandle,
    _dir: tempfile::TempDir,
    operations: OperationSet,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let paths = ImagePaths::in_directory(dir.path());
    paths.prepare().unwrap();

    let desktop = RecordingDesktop::default();
    let dialogs = ScriptedDialogs::default();
    let store = SharedStore::default();
    let handle = DispatchHandle::new(QueueSettings::default());

    let album = AlbumState::new(
        "https://imgur.com/a/first",
        vec!["a".into(), "b".into(), "c".into()],
        0,
    );
    let operations = OperationSet::new(
        album,
        paths,
        Collaborators {
            gallery: Box::new(TwoAlbums),
            desktop: Arc::new(desktop.clone()),
            dialogs: Box::new(dialogs.clone()),
            store: Box::new(store.clone()),
        },
        handle.clone(),
    );

    Fixture { desktop, dialogs, store, handle, _dir: dir, operations }
}

fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(5));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_rotations_then_quit_persist_position() {
    let Fixture { desktop, store, handle, operations, _dir, .. } = fixture();
    let dispatcher = Dispatcher::new(&handle, operations).spawn().unwrap();

    for op in [Operation::Next, Operation::Next, Operation::Prev] {
        handle.submit_operation(op).unwrap();
    }
    wait_for("three backgrounds", || desktop.shown.lock().len() == 3);

    handle.submit_operation(Operation::Quit).unwrap();
    let shutdown = dispatcher.join().unwrap();

    assert_eq!(shutdown, Shutdown::Quit);
    assert_eq!(*desktop.shown.lock(), vec!["a", "b", "a"]);
    assert_eq!(*desktop.exits.lock(), vec![0]);
    assert_eq!(
        store.saved.lock().clone(),
        Some(PersistedState { source_url: "https://imgur.com/a/first".into(), position: 1 })
    );
}

#[test]
fn test_change_source_drops_stale_rotations() {
    let Fixture { desktop, dialogs, store, handle, operations, _dir } = fixture();
    dialogs.answers.lock().push_back("https://imgur.com/a/second".into());

    // Queued before the dispatcher starts, so change-source (high priority)
    // runs first and its reset discards both rotations.
    handle.submit_operation(Operation::Next).unwrap();
    handle.submit_operation(Operation::Next).unwrap();
    handle.submit_operation(Operation::ChangeSource).unwrap();
    assert_eq!(handle.submit_operation(Operation::Random), Err(Rejected::Gated));

    let dispatcher = Dispatcher::new(&handle, operations).spawn().unwrap();
    wait_for("the gate to reopen", || !handle.is_blocked());
    assert_eq!(handle.pending(), 0);

    handle.submit_operation(Operation::Next).unwrap();
    wait_for("one background", || desktop.shown.lock().len() == 1);
    handle.submit_operation(Operation::Quit).unwrap();

    assert_eq!(dispatcher.join().unwrap(), Shutdown::Quit);
    assert_eq!(*desktop.shown.lock(), vec!["x"]);
    assert_eq!(
        store.saved.lock().clone(),
        Some(PersistedState { source_url: "https://imgur.com/a/second".into(), position: 1 })
    );
}

#[test]
fn test_unloadable_source_stops_dispatcher() {
    let Fixture { desktop, dialogs, handle, operations, _dir, .. } = fixture();
    dialogs.answers.lock().push_back("https://imgur.com/a/gone".into());

    handle.submit_operation(Operation::ChangeSource).unwrap();
    let shutdown = Dispatcher::new(&handle, operations).run();

    assert!(matches!(shutdown, Shutdown::Fatal(_)));
    assert_eq!(*desktop.exits.lock(), vec![1]);
}

/// Executor that only records what it ran.
struct Journal(Arc<Mutex<Vec<Operation>>>);

impl Execute for Journal {
    fn execute(&mut self, operation: Operation) -> Result<(), OperationError> {
        self.0.lock().push(operation);
        Ok(())
    }

    fn shutdown(&mut self) {}
}

#[test]
fn test_priority_then_fifo_order() {
    let handle = DispatchHandle::new(QueueSettings::default());
    let journal = Arc::new(Mutex::new(Vec::new()));

    handle.submit(Priority::Low, Operation::Next, false).unwrap();
    handle.submit(Priority::Medium, Operation::Random, false).unwrap();
    handle.submit(Priority::Low, Operation::Prev, false).unwrap();
    handle.submit(Priority::Urgent, Operation::Random, false).unwrap();
    handle.submit(Priority::Low, Operation::Quit, false).unwrap();

    let shutdown = Dispatcher::new(&handle, Journal(Arc::clone(&journal))).run();

    assert_eq!(shutdown, Shutdown::Quit);
    assert_eq!(
        *journal.lock(),
        vec![Operation::Random, Operation::Random, Operation::Next, Operation::Prev]
    );
}

#[test]
fn test_concurrent_producers_respect_capacity() {
    let handle = DispatchHandle::new(QueueSettings {
        capacity: 16,
        submit_timeout: Duration::ZERO,
    });

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            thread::spawn(move || {
                (0..10).filter(|_| handle.submit_operation(Operation::Next).is_ok()).count()
            })
        })
        .collect();
    let admitted: usize = producers.into_iter().map(|p| p.join().unwrap()).sum();

    assert_eq!(admitted, 16);
    assert_eq!(handle.pending(), 16);
}
