//! Desktop platform integration.
//!
//! Everything OS-specific the application needs sits behind [`Desktop`]:
//! applying a wallpaper, terminating the process and running the main-thread
//! input loop that keeps global hotkeys flowing. [`current`] picks the
//! variant once at startup.

mod generic;
pub mod path;
#[cfg(target_os = "windows")]
mod win32;

use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub use generic::GenericDesktop;
#[cfg(target_os = "windows")]
pub use win32::WindowsDesktop;

/// Handler the input loop calls repeatedly on the main thread.
///
/// It is given how long it may block waiting for input and returns
/// [`ControlFlow::Break`] to end the loop.
pub type InputHandler<'a> = dyn FnMut(Duration) -> ControlFlow<()> + 'a;

/// Platform capabilities.
pub trait Desktop: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Sets `path` as the desktop background. Returns whether it worked.
    fn set_background(&self, path: &Path) -> bool;

    /// Terminates the process with `code`.
    fn exit_process(&self, code: i32);

    /// Runs the input loop on the calling thread until `handler` breaks.
    fn run_input_loop(&self, handler: &mut InputHandler<'_>);
}

/// The desktop variant for the running OS.
#[must_use]
pub fn current() -> Arc<dyn Desktop> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(WindowsDesktop::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(GenericDesktop::new())
    }
}

/// Applies a wallpaper through the cross-platform wallpaper backend.
pub(crate) fn apply_wallpaper(path: &Path) -> bool {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "wallpaper file does not exist");
        return false;
    }

    let path_str = path.display().to_string();
    match wallpaper::set_from_path(&path_str) {
        Ok(()) => {
            tracing::info!(path = %path_str, "wallpaper set");
            true
        }
        Err(err) => {
            tracing::error!(path = %path_str, error = %err, "failed to set wallpaper");
            false
        }
    }
}
