//! The single dispatch worker.
//!
//! The dispatcher drains the command queue and runs each operation to
//! completion on its own thread before looking at the next one. Operations
//! therefore never overlap, which is what lets the album state and the
//! background image file live without locks.
//!
//! # Panic Recovery
//!
//! A panicking operation is caught and logged, the gate checkpoint still
//! runs, and the loop moves on to the next command.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::JoinHandle;

use super::command::{Command, Operation};
use super::gate::Checkpoint;
use super::handle::DispatchHandle;
use super::queue::CommandQueue;
use crate::error::OperationError;
use crate::utils::thread::spawn_named_thread;

/// Something that can run the operations the dispatcher dequeues.
pub trait Execute: Send {
    /// Runs `operation` to completion. Never called with [`Operation::Quit`].
    ///
    /// # Errors
    ///
    /// Returns the failure the operation already reported to the user.
    fn execute(&mut self, operation: Operation) -> Result<(), OperationError>;

    /// Orderly shutdown on `Quit`: persist state and terminate.
    fn shutdown(&mut self);
}

/// Dispatcher lifecycle states.
///
/// Observable from any thread through [`DispatchHandle::dispatcher_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DispatcherState {
    /// Waiting for the next command.
    Idle,
    /// Running an operation.
    Executing,
    /// Applying a deferred queue reset after an operation.
    Resetting,
    /// The loop has ended.
    Stopped,
}

impl DispatcherState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Executing,
            2 => Self::Resetting,
            _ => Self::Stopped,
        }
    }
}

/// Current [`DispatcherState`], written by the loop and read by handles.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) const fn new() -> Self { Self(AtomicU8::new(DispatcherState::Idle as u8)) }

    pub(crate) fn load(&self) -> DispatcherState {
        DispatcherState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Stores `next` and returns the previous state.
    fn swap(&self, next: DispatcherState) -> DispatcherState {
        DispatcherState::from_u8(self.0.swap(next as u8, Ordering::SeqCst))
    }
}

/// Why the dispatch loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shutdown {
    /// A `Quit` command was processed.
    Quit,
    /// An operation failed in a way the process cannot recover from.
    Fatal(String),
}

/// Single consumer of the command queue.
pub struct Dispatcher<E: Execute> {
    queue: Arc<CommandQueue>,
    executor: E,
    state: Arc<StateCell>,
}

impl<E: Execute + 'static> Dispatcher<E> {
    /// Creates a dispatcher draining the queue behind `handle`.
    pub fn new(handle: &DispatchHandle, executor: E) -> Self {
        Self {
            queue: Arc::clone(handle.queue()),
            executor,
            state: Arc::clone(handle.state_cell()),
        }
    }

    /// Runs the loop on a dedicated thread.
    ///
    /// Returns `None` if the thread could not be spawned.
    pub fn spawn(self) -> Option<JoinHandle<Shutdown>> {
        spawn_named_thread("dispatcher", move || self.run())
    }

    /// Runs the dispatch loop on the current thread until `Quit` or a fatal
    /// operation failure.
    pub fn run(mut self) -> Shutdown {
        tracing::debug!("dispatcher loop starting");

        loop {
            self.transition(DispatcherState::Idle);
            let command = self.queue.take_next();

            if command.operation == Operation::Quit {
                tracing::info!("quit command received, shutting down");
                self.transition(DispatcherState::Stopped);
                self.executor.shutdown();
                return Shutdown::Quit;
            }

            if let Some(reason) = self.dispatch(command) {
                self.transition(DispatcherState::Stopped);
                return Shutdown::Fatal(reason);
            }
        }
    }

    /// Executes one command and runs the gate checkpoint.
    ///
    /// Returns the reason if the dispatcher has to stop.
    fn dispatch(&mut self, command: Command) -> Option<String> {
        let operation = command.operation;
        self.transition(DispatcherState::Executing);
        tracing::debug!(%operation, "executing command");

        let result = catch_unwind(AssertUnwindSafe(|| self.executor.execute(operation)));

        let fatal = match result {
            Ok(Ok(())) => {
                tracing::debug!(%operation, "command finished");
                None
            }
            Ok(Err(err)) if err.is_fatal() => {
                tracing::error!(%operation, error = %err, "fatal operation failure");
                Some(err.to_string())
            }
            Ok(Err(err)) => {
                tracing::warn!(%operation, error = %err, "operation failed");
                None
            }
            Err(panic_info) => {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(%operation, panic = %panic_msg, "operation panicked, continuing");
                None
            }
        };

        if fatal.is_some() {
            return fatal;
        }

        if self.queue.gate().is_reset_pending() {
            self.transition(DispatcherState::Resetting);
        }

        if let Checkpoint::Reset { dropped } = self.queue.gate().complete(&self.queue, command.exclusive)
        {
            tracing::debug!(%operation, dropped, "pending commands discarded");
        }

        None
    }

    fn transition(&self, next: DispatcherState) {
        let previous = self.state.swap(next);
        if previous != next {
            tracing::trace!(from = ?previous, to = ?next, "dispatcher state");
        }
    }
}
