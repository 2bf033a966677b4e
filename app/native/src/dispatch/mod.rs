//! Serialized command dispatch.
//!
//! Producers (the hotkey thread) submit commands through a [`DispatchHandle`].
//! A single [`Dispatcher`] drains the bounded priority queue and runs each
//! operation to completion. Exclusive commands close the admission gate until
//! they finish, and a reset requested mid-command empties the queue right
//! after that command.

mod command;
mod dispatcher;
mod gate;
mod handle;
mod queue;

pub use command::{Command, Operation, Priority};
pub use dispatcher::{Dispatcher, DispatcherState, Execute, Shutdown};
pub use gate::{Checkpoint, GateController};
pub use handle::DispatchHandle;
pub use queue::{CommandQueue, DEFAULT_CAPACITY, DEFAULT_SUBMIT_TIMEOUT, QueueSettings, Rejected};
