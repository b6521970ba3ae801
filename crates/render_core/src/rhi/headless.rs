//! Headless graphics backend
//!
//! A no-GPU [`GraphicsContext`] that logs every call and keeps shared
//! counters. Used by tests and by applications that want to drive the
//! pipeline without a device (CI, server-side tools). It also asserts the
//! begin/end pairing contract, so mis-ordered command streams fail loudly
//! instead of corrupting device state silently on a real backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{Color, GraphicsContext, ViewportHandle};
use crate::ui::UiDrawData;

/// Shared call counters for the headless backend
///
/// Clone the `Arc` out of [`HeadlessContext::counters`] before handing the
/// context to the pipeline; the render thread owns the context afterwards.
#[derive(Debug, Default)]
pub struct HeadlessCounters {
    ui_inits: AtomicU64,
    ui_shutdowns: AtomicU64,
    viewports_begun: AtomicU64,
    surfaces_cleared: AtomicU64,
    ui_draws: AtomicU64,
    viewports_ended: AtomicU64,
    frame_markers: AtomicU64,
}

impl HeadlessCounters {
    /// Calls to `init_ui`
    #[must_use]
    pub fn ui_inits(&self) -> u64 {
        self.ui_inits.load(Ordering::Acquire)
    }

    /// Calls to `shutdown_ui`
    #[must_use]
    pub fn ui_shutdowns(&self) -> u64 {
        self.ui_shutdowns.load(Ordering::Acquire)
    }

    /// Calls to `begin_drawing_viewport`
    #[must_use]
    pub fn viewports_begun(&self) -> u64 {
        self.viewports_begun.load(Ordering::Acquire)
    }

    /// Calls to `clear_surface`
    #[must_use]
    pub fn surfaces_cleared(&self) -> u64 {
        self.surfaces_cleared.load(Ordering::Acquire)
    }

    /// Calls to `draw_ui`
    #[must_use]
    pub fn ui_draws(&self) -> u64 {
        self.ui_draws.load(Ordering::Acquire)
    }

    /// Calls to `end_drawing_viewport`
    #[must_use]
    pub fn viewports_ended(&self) -> u64 {
        self.viewports_ended.load(Ordering::Acquire)
    }

    /// Completed begin/end frame marker pairs
    #[must_use]
    pub fn frame_markers(&self) -> u64 {
        self.frame_markers.load(Ordering::Acquire)
    }
}

/// A [`GraphicsContext`] with no GPU behind it
pub struct HeadlessContext {
    counters: Arc<HeadlessCounters>,
    active_viewport: Option<String>,
    marker_open: bool,
}

impl HeadlessContext {
    /// Create a fresh headless context
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: Arc::new(HeadlessCounters::default()),
            active_viewport: None,
            marker_open: false,
        }
    }

    /// Shared handle to the call counters
    #[must_use]
    pub fn counters(&self) -> Arc<HeadlessCounters> {
        Arc::clone(&self.counters)
    }
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext for HeadlessContext {
    fn init_ui(&mut self) {
        log::debug!("headless: init_ui");
        self.counters.ui_inits.fetch_add(1, Ordering::Release);
    }

    fn shutdown_ui(&mut self) {
        log::debug!("headless: shutdown_ui");
        self.counters.ui_shutdowns.fetch_add(1, Ordering::Release);
    }

    fn begin_drawing_viewport(&mut self, viewport: &ViewportHandle) {
        assert!(
            self.active_viewport.is_none(),
            "begin_drawing_viewport('{}') while '{}' is still open",
            viewport.label(),
            self.active_viewport.as_deref().unwrap_or("")
        );
        log::debug!("headless: begin viewport '{}'", viewport.label());
        self.active_viewport = Some(viewport.label().to_string());
        self.counters.viewports_begun.fetch_add(1, Ordering::Release);
    }

    fn clear_surface(&mut self, viewport: &ViewportHandle, color: Color) {
        assert_eq!(
            self.active_viewport.as_deref(),
            Some(viewport.label()),
            "clear_surface outside the viewport's begin/end pair"
        );
        log::debug!("headless: clear '{}' to {:?}", viewport.label(), color);
        self.counters.surfaces_cleared.fetch_add(1, Ordering::Release);
    }

    fn draw_ui(&mut self, draw_data: &UiDrawData) {
        log::debug!(
            "headless: draw UI ({} lists, {} vertices)",
            draw_data.lists.len(),
            draw_data.total_vertex_count()
        );
        self.counters.ui_draws.fetch_add(1, Ordering::Release);
    }

    fn end_drawing_viewport(&mut self, viewport: &ViewportHandle, present: bool, vsync: bool) {
        assert_eq!(
            self.active_viewport.as_deref(),
            Some(viewport.label()),
            "end_drawing_viewport without a matching begin"
        );
        log::debug!(
            "headless: end viewport '{}' (present: {present}, vsync: {vsync})",
            viewport.label()
        );
        self.active_viewport = None;
        self.counters.viewports_ended.fetch_add(1, Ordering::Release);
    }

    fn begin_frame_marker(&mut self, label: &str) {
        assert!(!self.marker_open, "nested frame markers are not supported");
        log::trace!("headless: frame marker '{label}' open");
        self.marker_open = true;
    }

    fn end_frame_marker(&mut self) {
        assert!(self.marker_open, "end_frame_marker without a begin");
        log::trace!("headless: frame marker closed");
        self.marker_open = false;
        self.counters.frame_markers.fetch_add(1, Ordering::Release);
    }
}
