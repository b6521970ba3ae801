//! # UI Engine
//!
//! The frame snapshot producer: owns the set of UI output windows, runs
//! their per-tick snapshot handoff, and schedules the UI backend's
//! init/shutdown work on the render thread.
//!
//! ## Frame lifecycle
//!
//! ```rust
//! use render_core::config::PipelineConfig;
//! use render_core::pipeline::RenderPipeline;
//! use render_core::rhi::HeadlessContext;
//! use render_core::ui::UiEngine;
//!
//! let pipeline = RenderPipeline::init(
//!     PipelineConfig::default(),
//!     Box::new(HeadlessContext::new()),
//! ).expect("pipeline init");
//!
//! let mut ui = UiEngine::new();
//! let main_window = ui.init(&pipeline);
//!
//! // Per frame: build draw output, then hand it off.
//! ui.begin_frame();
//! ui.window_mut(main_window).expect("window").current_mut().display_size = [800.0, 600.0];
//! ui.end_frame(&pipeline);
//!
//! ui.shutdown(&pipeline);
//! pipeline.shutdown().expect("clean shutdown");
//! ```

pub mod draw_data;
pub mod window;

pub use draw_data::{UiDrawCall, UiDrawData, UiDrawList, UiDrawVertex};
pub use window::{UiWindow, UiWindowFlags};

use slotmap::{new_key_type, SlotMap};

use crate::pipeline::RenderPipeline;
use crate::rhi::ViewportHandle;

new_key_type! {
    /// Stable key for an open UI window
    pub struct UiWindowKey;
}

/// Owner of the UI output windows and their snapshot rings
#[derive(Default)]
pub struct UiEngine {
    windows: SlotMap<UiWindowKey, UiWindow>,
    frame_counter: u64,
}

impl UiEngine {
    /// Create an empty UI engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule backend UI setup and open the main window
    ///
    /// The init work runs on the render thread like any other deferred
    /// resource initialization; it is ordered before every draw command
    /// the windows will ever enqueue.
    pub fn init(&mut self, pipeline: &RenderPipeline) -> UiWindowKey {
        log::info!("initializing UI engine");
        pipeline.enqueue("init_ui_backend", |ctx| ctx.init_ui());
        self.open_window(pipeline, None, UiWindowFlags::empty())
    }

    /// Open a window with its own snapshot ring
    ///
    /// `viewport` is `None` for the main window, `Some` for a child window
    /// that needs its own begin/clear/draw/end command.
    pub fn open_window(
        &mut self,
        pipeline: &RenderPipeline,
        viewport: Option<ViewportHandle>,
        flags: UiWindowFlags,
    ) -> UiWindowKey {
        let ring = pipeline.new_snapshot_ring();
        let label = viewport.as_ref().map_or("main", |v| v.label());
        log::debug!("opening UI window '{label}'");
        self.windows.insert(UiWindow::new(viewport, flags, ring))
    }

    /// Close a window, destroying its snapshot ring
    ///
    /// Flushes first: an in-flight draw command may still reference the
    /// window's slots, and the ring must not be destroyed under it.
    pub fn close_window(&mut self, pipeline: &RenderPipeline, key: UiWindowKey) {
        if self.windows.contains_key(key) {
            pipeline.flush();
            self.windows.remove(key);
            log::debug!("closed UI window");
        }
    }

    /// Borrow a window
    #[must_use]
    pub fn window(&self, key: UiWindowKey) -> Option<&UiWindow> {
        self.windows.get(key)
    }

    /// Mutably borrow a window, e.g. to build its draw output
    pub fn window_mut(&mut self, key: UiWindowKey) -> Option<&mut UiWindow> {
        self.windows.get_mut(key)
    }

    /// Number of open windows
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Frames completed so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Start a UI tick: reset every window's transient draw output
    pub fn begin_frame(&mut self) {
        for window in self.windows.values_mut() {
            window.current_mut().clear();
        }
    }

    /// Finish a UI tick: snapshot and enqueue every window's draw output
    pub fn end_frame(&mut self, pipeline: &RenderPipeline) {
        let queue = pipeline.queue();
        for window in self.windows.values_mut() {
            window.tick(queue);
        }
        self.frame_counter += 1;
    }

    /// Close all windows and schedule backend UI teardown
    ///
    /// Flushes before dropping the rings and again after the teardown
    /// command, so the render thread is done with every UI resource when
    /// this returns.
    pub fn shutdown(&mut self, pipeline: &RenderPipeline) {
        log::info!("shutting down UI engine");
        pipeline.flush();
        self.windows.clear();
        pipeline.enqueue("shutdown_ui_backend", |ctx| ctx.shutdown_ui());
        pipeline.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::rhi::{HeadlessContext, Viewport};

    fn test_pipeline() -> (RenderPipeline, std::sync::Arc<crate::rhi::HeadlessCounters>) {
        let context = HeadlessContext::new();
        let counters = context.counters();
        let pipeline = RenderPipeline::init(PipelineConfig::default(), Box::new(context))
            .expect("pipeline init");
        (pipeline, counters)
    }

    #[test]
    fn test_init_opens_main_window_and_inits_backend() {
        let (pipeline, counters) = test_pipeline();
        let mut ui = UiEngine::new();

        let main = ui.init(&pipeline);
        pipeline.flush();

        assert_eq!(counters.ui_inits(), 1);
        assert_eq!(ui.window_count(), 1);
        assert!(ui.window(main).expect("main window").viewport().is_none());

        ui.shutdown(&pipeline);
        pipeline.shutdown().expect("clean shutdown");
        assert_eq!(counters.ui_shutdowns(), 1);
    }

    #[test]
    fn test_main_window_frame_draws_without_viewport_pair() {
        let (pipeline, counters) = test_pipeline();
        let mut ui = UiEngine::new();
        let _main = ui.init(&pipeline);

        for _ in 0..3 {
            ui.begin_frame();
            ui.end_frame(&pipeline);
        }
        pipeline.flush();

        assert_eq!(counters.ui_draws(), 3);
        assert_eq!(counters.viewports_begun(), 0);
        assert_eq!(ui.frame_count(), 3);

        ui.shutdown(&pipeline);
        pipeline.shutdown().expect("clean shutdown");
    }

    #[test]
    fn test_child_window_gets_begin_clear_draw_end() {
        let (pipeline, counters) = test_pipeline();
        let mut ui = UiEngine::new();
        let _main = ui.init(&pipeline);
        let child = ui.open_window(
            &pipeline,
            Some(Viewport::new("tools", 320, 240)),
            UiWindowFlags::empty(),
        );

        ui.begin_frame();
        ui.end_frame(&pipeline);
        pipeline.flush();

        assert_eq!(counters.viewports_begun(), 1);
        assert_eq!(counters.surfaces_cleared(), 1);
        assert_eq!(counters.viewports_ended(), 1);
        // Main window + child window both drew.
        assert_eq!(counters.ui_draws(), 2);

        ui.close_window(&pipeline, child);
        assert_eq!(ui.window_count(), 1);

        ui.shutdown(&pipeline);
        pipeline.shutdown().expect("clean shutdown");
    }

    #[test]
    fn test_no_background_clear_flag_skips_clear() {
        let (pipeline, counters) = test_pipeline();
        let mut ui = UiEngine::new();
        let _child = ui.open_window(
            &pipeline,
            Some(Viewport::new("overlay", 100, 100)),
            UiWindowFlags::NO_BACKGROUND_CLEAR,
        );

        ui.begin_frame();
        ui.end_frame(&pipeline);
        pipeline.flush();

        assert_eq!(counters.viewports_begun(), 1);
        assert_eq!(counters.surfaces_cleared(), 0);
        assert_eq!(counters.viewports_ended(), 1);

        ui.shutdown(&pipeline);
        pipeline.shutdown().expect("clean shutdown");
    }
}
