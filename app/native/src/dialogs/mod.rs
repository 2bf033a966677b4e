//! User-facing dialogs.
//!
//! Operations only talk to the [`Dialogs`] trait; [`NativeDialogs`] backs it
//! with native message boxes and save dialogs plus a shelled-out text prompt.

mod prompt;

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

/// Modal interaction with the user. All calls block until dismissed.
pub trait Dialogs: Send {
    /// Asks where to save a file. `None` if cancelled.
    fn prompt_save_as(&self, default_name: &str) -> Option<PathBuf>;

    /// Asks for a line of text. `None` if cancelled.
    fn prompt_string(&self, title: &str, message: &str, default: &str) -> Option<String>;

    fn show_error(&self, title: &str, message: &str);

    fn show_warning(&self, title: &str, message: &str);
}

/// Native dialogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn prompt_save_as(&self, default_name: &str) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Save File As...")
            .set_file_name(default_name)
            .add_filter("JPEG image", &["jpg"])
            .save_file()
    }

    fn prompt_string(&self, title: &str, message: &str, default: &str) -> Option<String> {
        prompt::prompt_line(title, message, default)
    }

    fn show_error(&self, title: &str, message: &str) {
        show_message(MessageLevel::Error, title, message);
    }

    fn show_warning(&self, title: &str, message: &str) {
        show_message(MessageLevel::Warning, title, message);
    }
}

fn show_message(level: MessageLevel, title: &str, message: &str) {
    tracing::debug!(%title, %message, "showing message dialog");
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
