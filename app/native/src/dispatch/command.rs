//! Command model for the dispatch queue.
//!
//! A [`Command`] pairs an [`Operation`] with the [`Priority`] it is served at
//! and whether it is exclusive (closes the admission gate until it finishes).

use std::cmp::Ordering;

use serde::Serialize;

/// Priority levels. Lower values are served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum Priority {
    Urgent = 0,
    High = 1,
    Medium = 5,
    Low = 10,
}

impl Priority {
    /// Numeric value used for ordering.
    #[must_use]
    pub const fn value(self) -> u8 { self as u8 }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering { self.value().cmp(&other.value()) }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Operations the dispatcher knows how to run.
///
/// `Quit` is the stop marker: the dispatcher matches it and shuts down
/// instead of executing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Show the next image of the album.
    Next,
    /// Show the previous image of the album.
    Prev,
    /// Show a random image of the album.
    Random,
    /// Copy the current background to a user-chosen file.
    Save,
    /// Prompt for a new album URL and reload the image list.
    ChangeSource,
    /// Persist state and terminate.
    Quit,
}

impl Operation {
    /// Stable name for logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Random => "random",
            Self::Save => "save",
            Self::ChangeSource => "change-source",
            Self::Quit => "quit",
        }
    }

    /// Priority this operation is submitted at when triggered by a hotkey.
    #[must_use]
    pub const fn default_priority(self) -> Priority {
        match self {
            Self::Next | Self::Prev | Self::Random => Priority::Low,
            Self::Save | Self::ChangeSource | Self::Quit => Priority::High,
        }
    }

    /// Whether the operation opens a modal prompt and must close the gate.
    #[must_use]
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Save | Self::ChangeSource | Self::Quit)
    }

    /// Whether this is one of the image rotation operations.
    #[cfg(test)]
    pub(crate) const fn is_rotation(self) -> bool { matches!(self, Self::Next | Self::Prev | Self::Random) }

    /// Builds the command a hotkey press for this operation submits.
    #[must_use]
    pub const fn into_command(self) -> Command {
        Command::new(self.default_priority(), self, self.is_exclusive())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

/// A queued unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub priority: Priority,
    pub operation: Operation,
    pub exclusive: bool,
}

impl Command {
    #[must_use]
    pub const fn new(priority: Priority, operation: Operation, exclusive: bool) -> Self {
        Self { priority, operation, exclusive }
    }
}

/// Heap entry ordering commands by priority, then by admission sequence.
///
/// The operation never takes part in the comparison, so equal priorities are
/// served strictly in the order they were admitted.
#[derive(Debug)]
pub(crate) struct Queued {
    pub(crate) seq: u64,
    pub(crate) command: Command,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Queued {}

impl Ord for Queued {
    // Reversed so that `BinaryHeap` (a max-heap) pops the lowest priority
    // value and, among equals, the lowest sequence number.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .command
            .priority
            .cmp(&self.command.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
