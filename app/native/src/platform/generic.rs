use std::path::Path;
use std::time::Duration;

use super::{Desktop, InputHandler, apply_wallpaper};

/// How long each input poll may block.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Desktop for platforms whose hotkey backend needs no message pump on the
/// calling thread.
#[derive(Debug, Default)]
pub struct GenericDesktop;

impl GenericDesktop {
    #[must_use]
    pub const fn new() -> Self { Self }
}

impl Desktop for GenericDesktop {
    fn name(&self) -> &'static str { "generic" }

    fn set_background(&self, path: &Path) -> bool { apply_wallpaper(path) }

    fn exit_process(&self, code: i32) {
        tracing::info!(code, "exiting");
        std::process::exit(code);
    }

    fn run_input_loop(&self, handler: &mut InputHandler<'_>) {
        while handler(POLL_INTERVAL).is_continue() {}
    }
}
