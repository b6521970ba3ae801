//! # Render Pipeline
//!
//! The cross-thread scheduling substrate: a FIFO command channel from the
//! main thread to a dedicated render thread, a blocking flush barrier, and
//! a fixed-slot ring buffer for frame snapshot handoff.
//!
//! ## Architecture
//!
//! - **RenderCommand**: a deferred, order-preserving unit of work
//! - **CommandQueue**: the FIFO channel producers enqueue onto
//! - **RenderThread**: the sole consumer; exclusively owns the graphics context
//! - **SnapshotRing**: reusable busy/free slots for per-frame payload handoff
//!
//! The pipeline is an explicitly constructed object with an `init`/`shutdown`
//! lifecycle; producers hold references (or cloned [`CommandQueue`] handles)
//! instead of reaching through globals.
//!
//! ## Consistency model
//!
//! Only GPU-affecting work rides the queue. Main-thread state the render
//! thread never touches (scene membership, simulation data) may be mutated
//! immediately by its owner; this crate neither forbids nor mediates that.

pub mod command;
pub mod queue;
pub mod ring;
pub mod thread;

#[cfg(test)]
mod pipeline_tests;

pub use command::{CommandJob, RenderCommand};
pub use queue::CommandQueue;
pub use ring::{FrameSlot, SlotHandle, SnapshotRing};
pub use thread::{RenderThread, RenderThreadState};

use std::time::Duration;
use thiserror::Error;

use crate::config::{ConfigError, PipelineConfig};
use crate::rhi::GraphicsContext;

/// Errors from pipeline lifecycle operations
///
/// Mid-stream failures (a disconnected channel, a panicking command) are
/// deliberately *not* represented here: they are fatal and abort with
/// diagnostics, because subsequent commands may depend on the side effects
/// of the failed one.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Spawning the render thread failed
    #[error("Pipeline initialization failed: {0}")]
    InitializationFailed(String),

    /// The render thread panicked before the shutdown join completed
    #[error("Render thread panicked during shutdown")]
    ShutdownFailed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The engine's cross-thread rendering pipeline
///
/// Owns the command channel and the render thread. Created with
/// [`RenderPipeline::init`], torn down with [`RenderPipeline::shutdown`],
/// which drains every queued command before the thread exits.
pub struct RenderPipeline {
    queue: CommandQueue,
    thread: Option<RenderThread>,
    config: PipelineConfig,
}

impl RenderPipeline {
    /// Validate the configuration, spawn the render thread, and hand it
    /// exclusive ownership of the graphics context
    pub fn init(
        config: PipelineConfig,
        context: Box<dyn GraphicsContext>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        log::info!(
            "initializing render pipeline (thread '{}', {} snapshot slots)",
            config.thread_name,
            config.snapshot_slots
        );

        let (queue, rx, shared) = CommandQueue::new();
        let thread = RenderThread::spawn(&config.thread_name, rx, shared, context)?;

        Ok(Self {
            queue,
            thread: Some(thread),
            config,
        })
    }

    /// Schedule deferred work on the render thread; see [`CommandQueue::enqueue`]
    pub fn enqueue<F>(&self, name: &'static str, job: F) -> u64
    where
        F: FnOnce(&mut dyn GraphicsContext) + Send + 'static,
    {
        self.queue.enqueue(name, job)
    }

    /// Block until all previously enqueued commands have completed; see
    /// [`CommandQueue::flush`]
    pub fn flush(&self) {
        self.queue.flush();
    }

    /// Borrow the producer queue
    #[must_use]
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Clone a producer handle for another enqueueing site
    #[must_use]
    pub fn queue_handle(&self) -> CommandQueue {
        self.queue.clone()
    }

    /// The configuration this pipeline was built with
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current render thread state, for diagnostics
    #[must_use]
    pub fn thread_state(&self) -> RenderThreadState {
        self.thread
            .as_ref()
            .map_or(RenderThreadState::Stopped, RenderThread::state)
    }

    /// Allocate a snapshot ring sized from this pipeline's configuration
    #[must_use]
    pub fn new_snapshot_ring<T: Default>(&self) -> SnapshotRing<T> {
        SnapshotRing::new(
            self.config.snapshot_slots,
            Duration::from_millis(self.config.starvation_warn_ms),
        )
    }

    /// Enqueue the terminal stop marker and join the render thread
    ///
    /// Every command enqueued before this call executes before the thread
    /// exits; nothing is skipped or dropped.
    pub fn shutdown(mut self) -> Result<(), PipelineError> {
        log::info!("shutting down render pipeline");
        self.shutdown_in_place()
    }

    fn shutdown_in_place(&mut self) -> Result<(), PipelineError> {
        if let Some(thread) = self.thread.take() {
            thread.mark_draining();
            self.queue.send_stop();
            thread.join()?;
        }
        Ok(())
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        if self.thread.is_some() {
            log::warn!("render pipeline dropped without explicit shutdown; draining now");
            if self.shutdown_in_place().is_err() {
                log::error!("render thread panicked during implicit shutdown");
            }
        }
    }
}
