//! Handle for submitting commands to the dispatcher.
//!
//! The `DispatchHandle` is the only public way to reach the command queue and
//! its gate. It is cheap to clone and can be shared across threads.

use std::sync::Arc;

use super::command::{Command, Operation, Priority};
use super::dispatcher::{DispatcherState, StateCell};
use super::gate::GateController;
use super::queue::{CommandQueue, QueueSettings, Rejected};

/// Producer-side handle to the command queue.
#[derive(Clone)]
pub struct DispatchHandle {
    queue: Arc<CommandQueue>,
    state: Arc<StateCell>,
}

impl DispatchHandle {
    /// Creates a fresh queue and gate and returns a handle to them.
    #[must_use]
    pub fn new(settings: QueueSettings) -> Self {
        let gate = Arc::new(GateController::new());
        Self {
            queue: Arc::new(CommandQueue::new(settings, gate)),
            state: Arc::new(StateCell::new()),
        }
    }

    /// Submits a command.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected::Gated`] if an exclusive command is pending or
    /// running, or [`Rejected::QueueFull`] if the queue stays full.
    pub fn submit(
        &self,
        priority: Priority,
        operation: Operation,
        exclusive: bool,
    ) -> Result<(), Rejected> {
        self.queue.submit(priority, operation, exclusive)
    }

    /// Submits `operation` with its default priority and exclusivity.
    ///
    /// # Errors
    ///
    /// See [`Self::submit`].
    pub fn submit_operation(&self, operation: Operation) -> Result<(), Rejected> {
        self.send(operation.into_command())
    }

    /// Submits a prebuilt command.
    ///
    /// # Errors
    ///
    /// See [`Self::submit`].
    pub fn send(&self, command: Command) -> Result<(), Rejected> {
        self.queue.submit_command(command)
    }

    /// Whether the gate currently refuses new commands.
    #[must_use]
    pub fn is_blocked(&self) -> bool { self.queue.gate().is_blocked() }

    /// Requests a deferred reset of the queue.
    pub fn request_reset(&self) { self.queue.gate().request_reset(); }

    /// Number of pending commands.
    #[must_use]
    pub fn pending(&self) -> usize { self.queue.len() }

    /// Maximum number of pending commands.
    #[must_use]
    pub fn capacity(&self) -> usize { self.queue.capacity() }

    /// What the dispatcher attached to this queue is doing right now.
    ///
    /// `Idle` until a dispatcher starts, `Stopped` once its loop has ended.
    #[must_use]
    pub fn dispatcher_state(&self) -> DispatcherState { self.state.load() }

    pub(crate) fn queue(&self) -> &Arc<CommandQueue> { &self.queue }

    pub(crate) fn state_cell(&self) -> &Arc<StateCell> { &self.state }
}

impl std::fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("pending", &self.pending())
            .field("blocked", &self.is_blocked())
            .field("dispatcher", &self.dispatcher_state())
            .finish()
    }
}
