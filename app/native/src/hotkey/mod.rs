//! Global hotkeys.
//!
//! Each configured chord is registered with the OS and mapped to an
//! [`Operation`]. Presses are turned into commands and submitted to the
//! dispatcher; a rejected submission (gate closed or queue full) is logged
//! and the key press is dropped.

use std::collections::HashMap;
use std::time::Duration;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use thiserror::Error;

use crate::config::KeybindingsConfig;
use crate::dispatch::{DispatchHandle, Operation, Rejected};

/// Errors setting up global hotkeys.
#[derive(Debug, Error)]
pub enum HotkeyError {
    /// The OS hotkey backend could not be initialized.
    #[error("failed to initialize hotkey manager: {0}")]
    Manager(String),
    /// A configured chord could not be parsed.
    #[error("invalid shortcut '{shortcut}' for {operation}: {message}")]
    Parse {
        operation: Operation,
        shortcut: String,
        message: String,
    },
    /// Not a single hotkey could be registered.
    #[error("no hotkey could be registered")]
    NothingRegistered,
}

/// Parses every configured chord.
///
/// Empty chords disable their operation.
///
/// # Errors
///
/// Returns [`HotkeyError::Parse`] for the first chord that does not parse.
pub fn parse_bindings(config: &KeybindingsConfig) -> Result<Vec<(Operation, HotKey)>, HotkeyError> {
    config
        .bindings()
        .into_iter()
        .filter(|(_, shortcut)| !shortcut.trim().is_empty())
        .map(|(operation, shortcut)| {
            normalize_shortcut(shortcut)
                .parse::<HotKey>()
                .map(|hotkey| (operation, hotkey))
                .map_err(|err| HotkeyError::Parse {
                    operation,
                    shortcut: shortcut.to_string(),
                    message: err.to_string(),
                })
        })
        .collect()
}

/// Normalizes common spellings of modifier names.
///
/// - "Opt" and "Option" become "Alt"
/// - "Cmd", "Command", "Meta" and "Win" become "Super"
/// - "Ctrl" becomes "Control"
/// - backtick (`` ` ``) becomes "Backquote"
fn normalize_shortcut(shortcut: &str) -> String {
    let mut result = String::with_capacity(shortcut.len() + 8);

    for part in shortcut.split('+').map(str::trim) {
        if !result.is_empty() {
            result.push('+');
        }

        let normalized = match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => "Control",
            "cmd" | "command" | "super" | "meta" | "win" => "Super",
            "alt" | "opt" | "option" => "Alt",
            "shift" => "Shift",
            "`" => "Backquote",
            _ => part,
        };

        result.push_str(normalized);
    }

    result
}

/// Submits the command for a pressed hotkey.
///
/// Returns whether the command was admitted.
pub fn submit_press(handle: &DispatchHandle, operation: Operation) -> bool {
    match handle.submit_operation(operation) {
        Ok(()) => true,
        Err(Rejected::Gated) => {
            tracing::debug!(%operation, "hotkey ignored, an exclusive operation is in progress");
            false
        }
        Err(Rejected::QueueFull) => {
            tracing::warn!(%operation, "hotkey dropped, command queue is full");
            false
        }
    }
}

/// Registered hotkeys feeding the dispatcher.
///
/// Must stay alive (and on the thread that created it) for the hotkeys to
/// remain registered.
pub struct HotkeyListener {
    _manager: GlobalHotKeyManager,
    operations: HashMap<u32, Operation>,
    handle: DispatchHandle,
}

impl HotkeyListener {
    /// Registers the configured hotkeys.
    ///
    /// A chord that the OS refuses (usually because another application owns
    /// it) is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a chord is invalid, the backend cannot start, or
    /// nothing could be registered.
    pub fn register(config: &KeybindingsConfig, handle: DispatchHandle) -> Result<Self, HotkeyError> {
        let bindings = parse_bindings(config)?;
        let manager =
            GlobalHotKeyManager::new().map_err(|err| HotkeyError::Manager(err.to_string()))?;

        let mut operations = HashMap::new();
        for (operation, hotkey) in bindings {
            if let Some(previous) = operations.get(&hotkey.id()) {
                tracing::warn!(%operation, %previous, "shortcut already bound, skipping");
                continue;
            }

            match manager.register(hotkey) {
                Ok(()) => {
                    tracing::debug!(%operation, id = hotkey.id(), "hotkey registered");
                    operations.insert(hotkey.id(), operation);
                }
                Err(err) => {
                    tracing::warn!(%operation, error = %err, "failed to register hotkey");
                }
            }
        }

        if operations.is_empty() {
            return Err(HotkeyError::NothingRegistered);
        }

        tracing::info!(count = operations.len(), "global hotkeys registered");
        Ok(Self { _manager: manager, operations, handle })
    }

    /// Handles pending hotkey events, waiting up to `wait` for the first one.
    ///
    /// Returns the number of commands admitted.
    pub fn poll(&self, wait: Duration) -> usize {
        let receiver = GlobalHotKeyEvent::receiver();
        let mut admitted = 0;

        let mut next = receiver.recv_timeout(wait).ok();
        while let Some(event) = next {
            next = receiver.try_recv().ok();
            if event.state != HotKeyState::Pressed {
                continue;
            }
            let Some(&operation) = self.operations.get(&event.id) else {
                continue;
            };
            if submit_press(&self.handle, operation) {
                admitted += 1;
            }
        }

        admitted
    }
}
