//! FIFO command channel between producer threads and the render thread
//!
//! Built on an unbounded `crossbeam-channel`, which gives strict
//! arrival-order delivery and a blocking receive on the consumer side, so
//! the render thread suspends instead of spinning when idle.
//!
//! Failure semantics follow the engine contract: a command that cannot be
//! delivered desynchronizes render state from simulation state, so a
//! disconnected channel (the render thread is gone) is fatal and aborts
//! with diagnostics rather than returning an error.

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::command::RenderCommand;
use crate::rhi::GraphicsContext;

/// Wire format of the render channel
///
/// Barriers and the terminal stop marker travel the same FIFO as ordinary
/// commands, so their ordering relative to prior work is guaranteed by the
/// channel itself.
pub(crate) enum Message {
    /// Execute a deferred command
    Run(RenderCommand),
    /// Flush rendezvous; the render thread signals the sender on arrival
    Barrier(Sender<()>),
    /// Terminal marker; the render thread exits after observing it
    Stop,
}

/// Counters shared between producers and the render thread
pub(crate) struct QueueShared {
    next_ordinal: AtomicU64,
    executed: AtomicU64,
}

impl QueueShared {
    pub(crate) fn record_executed(&self) {
        self.executed.fetch_add(1, Ordering::Release);
    }
}

/// Producer handle to the render command channel
///
/// Cheap to clone; all clones feed the same FIFO. In practice there is one
/// logical producer sequence at a time, but concurrent enqueues from
/// initialization paths are safe.
#[derive(Clone)]
pub struct CommandQueue {
    tx: Sender<Message>,
    shared: Arc<QueueShared>,
}

impl CommandQueue {
    /// Create the channel, returning the producer handle plus the consumer
    /// endpoint for the render thread
    pub(crate) fn new() -> (Self, Receiver<Message>, Arc<QueueShared>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let shared = Arc::new(QueueShared {
            next_ordinal: AtomicU64::new(0),
            executed: AtomicU64::new(0),
        });
        let queue = Self {
            tx,
            shared: Arc::clone(&shared),
        };
        (queue, rx, shared)
    }

    /// Append a command to the tail of the queue
    ///
    /// Wakes the render thread if it is idle. Returns the command's ordinal.
    /// Captured state must be owned or `Arc`-held; the `Send + 'static`
    /// bound enforces that at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the render thread has exited; a silently dropped command
    /// has no recovery path.
    pub fn enqueue<F>(&self, name: &'static str, job: F) -> u64
    where
        F: FnOnce(&mut dyn GraphicsContext) + Send + 'static,
    {
        let ordinal = self.shared.next_ordinal.fetch_add(1, Ordering::Relaxed);
        let command = RenderCommand::new(ordinal, name, Box::new(job));
        log::trace!("enqueue render command #{ordinal} '{name}'");
        if self.tx.send(Message::Run(command)).is_err() {
            log::error!("render thread is gone; command '{name}' (#{ordinal}) cannot be delivered");
            panic!("render command queue disconnected");
        }
        ordinal
    }

    /// Block until every command enqueued strictly before this call has
    /// finished executing
    ///
    /// Says nothing about commands enqueued concurrently by other producers
    /// after this call began. Used before destroying any resource a queued
    /// command may still reference, and at shutdown.
    ///
    /// # Panics
    ///
    /// Panics if the render thread exited before reaching the barrier.
    pub fn flush(&self) {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        if self.tx.send(Message::Barrier(done_tx)).is_err() {
            log::error!("render thread is gone; flush barrier cannot be delivered");
            panic!("render command queue disconnected");
        }
        if done_rx.recv().is_err() {
            log::error!("render thread exited before reaching the flush barrier");
            panic!("render thread lost mid-flush");
        }
    }

    /// Append the terminal stop marker
    ///
    /// All commands ahead of the marker still execute; a disconnected
    /// channel here means the thread is already gone, which is fine for
    /// shutdown purposes.
    pub(crate) fn send_stop(&self) {
        let _ = self.tx.send(Message::Stop);
    }

    /// Number of commands enqueued so far
    #[must_use]
    pub fn enqueued_count(&self) -> u64 {
        self.shared.next_ordinal.load(Ordering::Relaxed)
    }

    /// Number of commands that have finished executing
    #[must_use]
    pub fn executed_count(&self) -> u64 {
        self.shared.executed.load(Ordering::Acquire)
    }
}
