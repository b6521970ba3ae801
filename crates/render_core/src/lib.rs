//! # Render Core
//!
//! The cross-thread rendering substrate of the engine: a FIFO command
//! pipeline from the simulation ("main") thread to a dedicated render
//! thread, plus a fixed-slot ring buffer for per-frame snapshot handoff.
//!
//! ## Features
//!
//! - **Command Pipeline**: deferred GPU-affecting work executes on the
//!   render thread in exact enqueue order
//! - **Flush Barrier**: a blocking guarantee that all previously enqueued
//!   commands have completed, for teardown and resource destruction
//! - **Snapshot Ring**: reusable busy/free slots that pass deep-copied
//!   frame data between threads without aliasing
//! - **UI Engine**: the immediate-mode UI handoff path built on the ring
//! - **Headless Backend**: a no-GPU graphics context for tests and tools
//!
//! ## Quick Start
//!
//! ```rust
//! use render_core::prelude::*;
//!
//! let context = HeadlessContext::new();
//! let pipeline = RenderPipeline::init(PipelineConfig::default(), Box::new(context))
//!     .expect("pipeline init");
//!
//! // Schedule deferred work for the render thread.
//! pipeline.enqueue("example", |_ctx| {
//!     // runs on the render thread, in enqueue order
//! });
//!
//! // Block until everything enqueued so far has executed.
//! pipeline.flush();
//!
//! // Drain remaining work and join the render thread.
//! pipeline.shutdown().expect("clean shutdown");
//! ```
//!
//! ## Threading model
//!
//! Exactly two cooperating long-lived threads: the main thread produces
//! commands and snapshots; the render thread is the sole consumer and the
//! only thread permitted to call into the graphics context. The main
//! thread blocks in `flush()` and, when the render thread falls a full
//! ring behind, in snapshot acquisition; the render thread suspends when
//! the queue is empty.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod pipeline;
pub mod rhi;
pub mod ui;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{CommandQueue, PipelineError, RenderPipeline, RenderThreadState, SlotHandle, SnapshotRing};
pub use rhi::{Color, GraphicsContext, HeadlessContext, Viewport, ViewportHandle};
pub use ui::{UiDrawData, UiEngine, UiWindowFlags, UiWindowKey};

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        config::PipelineConfig,
        pipeline::{CommandQueue, PipelineError, RenderPipeline, SnapshotRing},
        rhi::{Color, GraphicsContext, HeadlessContext, Viewport, ViewportHandle},
        ui::{UiDrawData, UiEngine, UiWindowFlags},
    };
}
