//! Admission gate and deferred queue reset.
//!
//! The gate closes when an exclusive command is admitted and reopens once the
//! dispatcher has finished running it. A reset requested while a command runs
//! is only applied at the checkpoint that follows that command, before the
//! next dequeue.

use std::sync::atomic::{AtomicBool, Ordering};

use super::queue::{CommandQueue, Pending};

/// What the post-command checkpoint did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Nothing to do.
    Unchanged,
    /// An exclusive command finished and the gate was reopened.
    Reopened,
    /// A pending reset emptied the queue; the gate is open.
    Reset { dropped: usize },
}

/// Shared blocked / reset-pending flags.
#[derive(Debug, Default)]
pub struct GateController {
    blocked: AtomicBool,
    reset_pending: AtomicBool,
}

impl GateController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocked: AtomicBool::new(false),
            reset_pending: AtomicBool::new(false),
        }
    }

    /// Whether new commands are currently refused.
    #[must_use]
    pub fn is_blocked(&self) -> bool { self.blocked.load(Ordering::SeqCst) }

    /// Whether a reset is waiting for the current command to finish.
    #[must_use]
    pub fn is_reset_pending(&self) -> bool { self.reset_pending.load(Ordering::SeqCst) }

    /// Marks the queue for a reset once the running command completes.
    pub fn request_reset(&self) {
        if !self.reset_pending.swap(true, Ordering::SeqCst) {
            tracing::info!("queue reset requested, applying after the current command");
        }
    }

    /// Closes the gate if it is open. Returns `false` if it was already closed.
    pub(crate) fn try_close(&self) -> bool {
        let closed = self
            .blocked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if closed {
            tracing::debug!("gate closed");
        }
        closed
    }

    /// Post-command checkpoint, run by the dispatcher after every command.
    ///
    /// Applies a pending reset first (which also leaves the gate open), else
    /// reopens the gate if the finished command was exclusive. Runs under the
    /// queue lock so no submitter observes an intermediate state.
    pub fn complete(&self, queue: &CommandQueue, exclusive: bool) -> Checkpoint {
        queue.with_pending(|pending: &mut Pending| {
            if self.reset_pending.swap(false, Ordering::SeqCst) {
                let dropped = pending.clear();
                self.blocked.store(false, Ordering::SeqCst);
                tracing::info!(dropped, "command queue reset");
                Checkpoint::Reset { dropped }
            } else if exclusive {
                self.blocked.store(false, Ordering::SeqCst);
                tracing::debug!("gate reopened");
                Checkpoint::Reopened
            } else {
                Checkpoint::Unchanged
            }
        })
    }
}
