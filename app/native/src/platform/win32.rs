//! Windows desktop.
//!
//! Global hotkeys arrive as window messages on the thread that registered
//! them, so the input loop has to pump that thread's message queue.

use std::path::Path;
use std::time::Duration;

use ::windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage,
};

use super::{Desktop, InputHandler, apply_wallpaper};

/// Sleep between pump passes when the queue is empty.
const IDLE_WAIT: Duration = Duration::from_millis(25);

#[derive(Debug, Default)]
pub struct WindowsDesktop;

impl WindowsDesktop {
    #[must_use]
    pub const fn new() -> Self { Self }

    /// Dispatches every queued message. Returns whether any was handled.
    fn pump_messages() -> bool {
        let mut handled = false;
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
                handled = true;
            }
        }
        handled
    }
}

impl Desktop for WindowsDesktop {
    fn name(&self) -> &'static str { "windows" }

    fn set_background(&self, path: &Path) -> bool { apply_wallpaper(path) }

    fn exit_process(&self, code: i32) {
        tracing::info!(code, "exiting");
        std::process::exit(code);
    }

    fn run_input_loop(&self, handler: &mut InputHandler<'_>) {
        loop {
            let wait = if Self::pump_messages() { Duration::ZERO } else { IDLE_WAIT };
            if handler(wait).is_break() {
                break;
            }
        }
    }
}
