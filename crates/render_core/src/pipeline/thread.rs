//! The dedicated render worker thread
//!
//! Exactly one render thread exists per pipeline. It exclusively owns the
//! graphics context; no other thread may touch the device. The worker
//! drains the command channel in arrival order and suspends (no busy
//! spinning) whenever the channel is empty.

use crossbeam_channel::Receiver;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::queue::{Message, QueueShared};
use super::PipelineError;
use crate::rhi::GraphicsContext;

/// Lifecycle states of the render worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderThreadState {
    /// Spawned but not yet in the drain loop
    Starting = 0,
    /// Draining and executing commands
    Running = 1,
    /// Shutdown requested; finishing queued work ahead of the stop marker
    Draining = 2,
    /// Drain loop exited
    Stopped = 3,
}

impl RenderThreadState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Starting,
            1 => Self::Running,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// Handle to the long-lived render worker
pub struct RenderThread {
    handle: Option<JoinHandle<()>>,
    state: Arc<AtomicU8>,
}

impl RenderThread {
    /// Spawn the worker and hand it exclusive ownership of the context
    pub(crate) fn spawn(
        name: &str,
        rx: Receiver<Message>,
        shared: Arc<QueueShared>,
        mut context: Box<dyn GraphicsContext>,
    ) -> Result<Self, PipelineError> {
        let state = Arc::new(AtomicU8::new(RenderThreadState::Starting as u8));
        let thread_state = Arc::clone(&state);

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                thread_state.store(RenderThreadState::Running as u8, Ordering::Release);
                log::info!("render thread started");
                Self::drain_and_execute(&rx, &shared, context.as_mut());
                thread_state.store(RenderThreadState::Stopped as u8, Ordering::Release);
                log::info!("render thread stopped");
            })
            .map_err(|e| PipelineError::InitializationFailed(format!("spawn render thread: {e}")))?;

        Ok(Self {
            handle: Some(handle),
            state,
        })
    }

    /// Loop body of the worker: pop, execute, repeat; block when empty
    ///
    /// Returns only after observing the terminal stop marker or after every
    /// producer handle has been dropped. Everything enqueued ahead of the
    /// marker has executed by then; the channel's FIFO order guarantees it.
    fn drain_and_execute(
        rx: &Receiver<Message>,
        shared: &QueueShared,
        context: &mut dyn GraphicsContext,
    ) {
        for message in rx.iter() {
            match message {
                Message::Run(command) => {
                    log::trace!("execute render command #{} '{}'", command.ordinal(), command.name());
                    command.execute(context);
                    shared.record_executed();
                }
                Message::Barrier(done) => {
                    // Receiver may have given up only if the producer died;
                    // nothing to do about it here either way.
                    let _ = done.send(());
                }
                Message::Stop => {
                    log::debug!("render thread observed stop marker");
                    break;
                }
            }
        }
    }

    /// Current lifecycle state, for diagnostics
    #[must_use]
    pub fn state(&self) -> RenderThreadState {
        RenderThreadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Publish the draining state before the stop marker is enqueued
    pub(crate) fn mark_draining(&self) {
        self.state.store(RenderThreadState::Draining as u8, Ordering::Release);
    }

    /// Wait for the worker to exit
    pub(crate) fn join(mut self) -> Result<(), PipelineError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| PipelineError::ShutdownFailed)?;
        }
        Ok(())
    }
}
