//! Bounded priority queue feeding the dispatcher.
//!
//! Admission (gate check, capacity wait, insertion and the exclusive gate
//! flip) happens inside a single critical section on the queue mutex. The
//! gate checkpoint after each command takes the same mutex, so a submitter
//! can never slip a command in between "gate is open" and "gate closed".

use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::command::{Command, Operation, Priority, Queued};
use super::gate::GateController;

/// Default maximum number of pending commands.
pub const DEFAULT_CAPACITY: usize = 200;

/// Default time `submit` waits for space in a full queue.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Reasons a command was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    /// The queue stayed full for the whole submit timeout.
    #[error("command queue is full")]
    QueueFull,
    /// An exclusive command is pending or running.
    #[error("command queue is blocked by an exclusive command")]
    Gated,
}

/// Sizing and backpressure settings for the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSettings {
    pub capacity: usize,
    pub submit_timeout: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }
}

/// Pending commands, only reachable with the queue lock held.
pub(crate) struct Pending {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
    capacity: usize,
}

impl Pending {
    fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
            capacity,
        }
    }

    fn is_full(&self) -> bool { self.heap.len() >= self.capacity }

    /// Replaces the pending set with an empty one of the same capacity.
    ///
    /// Returns the number of dropped commands.
    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap = BinaryHeap::with_capacity(self.capacity);
        dropped
    }
}

/// Bounded, priority-ordered, FIFO-stable command queue.
pub struct CommandQueue {
    pending: Mutex<Pending>,
    not_empty: Condvar,
    not_full: Condvar,
    gate: Arc<GateController>,
    submit_timeout: Duration,
}

impl CommandQueue {
    /// Creates an empty queue guarded by `gate`.
    ///
    /// A capacity of zero is raised to one so that the queue can hold at
    /// least the command being admitted.
    #[must_use]
    pub fn new(settings: QueueSettings, gate: Arc<GateController>) -> Self {
        let capacity = settings.capacity.max(1);
        tracing::info!(capacity, "command queue initialized");

        Self {
            pending: Mutex::new(Pending::new(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            gate,
            submit_timeout: settings.submit_timeout,
        }
    }

    /// Admits a command.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected::Gated`] without waiting when the gate is closed,
    /// and [`Rejected::QueueFull`] when no space frees up within the submit
    /// timeout.
    pub fn submit(
        &self,
        priority: Priority,
        operation: Operation,
        exclusive: bool,
    ) -> Result<(), Rejected> {
        let mut pending = self.pending.lock();

        if self.gate.is_blocked() {
            tracing::debug!(%operation, "gate closed, rejecting command");
            return Err(Rejected::Gated);
        }

        if pending.is_full() {
            let deadline = Instant::now() + self.submit_timeout;
            while pending.is_full() {
                if self.not_full.wait_until(&mut pending, deadline).timed_out() {
                    break;
                }
            }

            if pending.is_full() {
                tracing::error!(
                    %operation,
                    priority = priority.value(),
                    exclusive,
                    "command queue full, dropping command"
                );
                return Err(Rejected::QueueFull);
            }

            // The lock was released while waiting.
            if self.gate.is_blocked() {
                tracing::debug!(%operation, "gate closed while waiting for space");
                return Err(Rejected::Gated);
            }
        }

        if exclusive && !self.gate.try_close() {
            return Err(Rejected::Gated);
        }

        let seq = pending.next_seq;
        pending.next_seq += 1;
        pending.heap.push(Queued {
            seq,
            command: Command::new(priority, operation, exclusive),
        });
        drop(pending);

        tracing::debug!(%operation, priority = priority.value(), exclusive, "command queued");
        self.not_empty.notify_one();
        Ok(())
    }

    /// Submits `command` as-is.
    ///
    /// # Errors
    ///
    /// See [`Self::submit`].
    pub fn submit_command(&self, command: Command) -> Result<(), Rejected> {
        self.submit(command.priority, command.operation, command.exclusive)
    }

    /// Removes and returns the next command, blocking while the queue is empty.
    pub fn take_next(&self) -> Command {
        let mut pending = self.pending.lock();
        loop {
            if let Some(queued) = pending.heap.pop() {
                drop(pending);
                self.not_full.notify_one();
                return queued.command;
            }
            self.not_empty.wait(&mut pending);
        }
    }

    /// Like [`Self::take_next`] but gives up after `timeout`.
    #[cfg(test)]
    pub(crate) fn take_next_timeout(&self, timeout: Duration) -> Option<Command> {
        let deadline = Instant::now() + timeout;
        let mut pending = self.pending.lock();
        loop {
            if let Some(queued) = pending.heap.pop() {
                drop(pending);
                self.not_full.notify_one();
                return Some(queued.command);
            }
            if self.not_empty.wait_until(&mut pending, deadline).timed_out() {
                return pending.heap.pop().map(|queued| queued.command);
            }
        }
    }

    /// Runs `f` with the pending set locked, then wakes blocked submitters.
    pub(crate) fn with_pending<R>(&self, f: impl FnOnce(&mut Pending) -> R) -> R {
        let result = f(&mut self.pending.lock());
        self.not_full.notify_all();
        result
    }

    /// Holds the queue lock, stalling submitters and the dispatcher checkpoint.
    #[cfg(test)]
    pub(crate) fn lock_pending(&self) -> parking_lot::MutexGuard<'_, Pending> { self.pending.lock() }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize { self.pending.lock().heap.len() }

    /// Whether no command is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.pending.lock().heap.is_empty() }

    /// Maximum number of pending commands.
    #[must_use]
    pub fn capacity(&self) -> usize { self.pending.lock().capacity }

    /// The gate guarding admission.
    #[must_use]
    pub fn gate(&self) -> &Arc<GateController> { &self.gate }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn queue(capacity: usize, timeout: Duration) -> CommandQueue {
        CommandQueue::new(
            QueueSettings { capacity, submit_timeout: timeout },
            Arc::new(GateController::new()),
        )
    }

    fn drain(queue: &CommandQueue) -> Vec<Operation> {
        std::iter::from_fn(|| queue.take_next_timeout(Duration::ZERO))
            .map(|cmd| cmd.operation)
            .collect()
    }

    #[test]
    fn test_take_next_serves_priority_then_fifo() {
        let queue = queue(16, Duration::ZERO);
        queue.submit(Priority::Low, Operation::Next, false).unwrap();
        queue.submit(Priority::Low, Operation::Prev, false).unwrap();
        queue.submit(Priority::Medium, Operation::Random, false).unwrap();
        queue.submit(Priority::Low, Operation::Random, false).unwrap();
        queue.submit(Priority::Urgent, Operation::Next, false).unwrap();

        let priorities: Vec<_> = std::iter::from_fn(|| queue.take_next_timeout(Duration::ZERO))
            .map(|cmd| (cmd.priority, cmd.operation))
            .collect();

        assert_eq!(
            priorities,
            vec![
                (Priority::Urgent, Operation::Next),
                (Priority::Medium, Operation::Random),
                (Priority::Low, Operation::Next),
                (Priority::Low, Operation::Prev),
                (Priority::Low, Operation::Random),
            ]
        );
    }

    #[test]
    fn test_capacity_one_timeout_zero_rejects_second_submit() {
        let queue = queue(1, Duration::ZERO);
        queue.submit(Priority::Low, Operation::Next, false).unwrap();

        let result = queue.submit(Priority::Low, Operation::Prev, false);
        assert_eq!(result, Err(Rejected::QueueFull));

        assert_eq!(queue.len(), 1);
        assert_eq!(drain(&queue), vec![Operation::Next]);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let queue = queue(0, Duration::ZERO);
        assert_eq!(queue.capacity(), 1);
        assert!(queue.submit(Priority::Low, Operation::Next, false).is_ok());
    }

    #[test]
    fn test_exclusive_submit_closes_gate() {
        let queue = queue(8, Duration::ZERO);
        queue.submit(Priority::High, Operation::Save, true).unwrap();
        assert!(queue.gate().is_blocked());
    }

    #[test]
    fn test_gated_submit_leaves_queue_unchanged() {
        let queue = queue(8, Duration::ZERO);
        queue.submit(Priority::Low, Operation::Next, false).unwrap();
        queue.submit(Priority::High, Operation::Save, true).unwrap();

        for op in [Operation::Next, Operation::Quit, Operation::ChangeSource] {
            let result = queue.submit_command(op.into_command());
            assert_eq!(result, Err(Rejected::Gated));
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(drain(&queue), vec![Operation::Save, Operation::Next]);
    }

    #[test]
    fn test_gated_submit_does_not_wait_on_full_queue() {
        let queue = queue(1, Duration::from_secs(5));
        queue.submit_command(Operation::Save.into_command()).unwrap();
        assert!(queue.gate().is_blocked());

        let started = Instant::now();
        let result = queue.submit(Priority::Low, Operation::Next, false);

        assert_eq!(result, Err(Rejected::Gated));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_two_exclusive_submits_cannot_both_be_admitted() {
        let queue = Arc::new(queue(8, Duration::ZERO));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.submit(Priority::High, Operation::Save, true))
            })
            .collect();

        let admitted =
            handles.into_iter().map(|h| h.join().unwrap()).filter(Result::is_ok).count();

        assert_eq!(admitted, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_full_queue_waits_for_space_within_timeout() {
        let queue = Arc::new(queue(1, Duration::from_secs(5)));
        queue.submit(Priority::Low, Operation::Next, false).unwrap();

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                queue.take_next()
            })
        };

        assert!(queue.submit(Priority::Low, Operation::Prev, false).is_ok());
        assert_eq!(consumer.join().unwrap().operation, Operation::Next);
        assert_eq!(drain(&queue), vec![Operation::Prev]);
    }

    #[test]
    fn test_take_next_blocks_until_submit() {
        let queue = Arc::new(queue(4, Duration::ZERO));
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.take_next())
        };

        thread::sleep(Duration::from_millis(30));
        queue.submit(Priority::Low, Operation::Random, false).unwrap();

        assert_eq!(consumer.join().unwrap().operation, Operation::Random);
    }

    #[test]
    fn test_take_next_timeout_returns_none_when_empty() {
        let queue = queue(4, Duration::ZERO);
        assert!(queue.take_next_timeout(Duration::from_millis(10)).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pending_clear_keeps_capacity() {
        let queue = queue(3, Duration::ZERO);
        queue.submit(Priority::Low, Operation::Next, false).unwrap();
        queue.submit(Priority::Low, Operation::Prev, false).unwrap();

        let dropped = queue.with_pending(Pending::clear);

        assert_eq!(dropped, 2);
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 3);
    }
}
