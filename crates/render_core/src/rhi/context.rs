//! The render-thread-only device context trait

use super::{Color, ViewportHandle};
use crate::ui::UiDrawData;

/// Operations a graphics backend exposes to executing commands
///
/// # Contract
///
/// - Methods are called only from the render thread; the pipeline enforces
///   this by routing every call through an executing [`RenderCommand`].
/// - `begin_drawing_viewport` / `end_drawing_viewport` come in pairs per
///   viewport, with clears and draws for that viewport in between.
/// - The main window's UI is drawn without a viewport pair; the platform
///   swapchain handles its presentation.
///
/// [`RenderCommand`]: crate::pipeline::RenderCommand
pub trait GraphicsContext: Send {
    /// One-time backend setup for UI rendering (font atlas, pipelines)
    fn init_ui(&mut self);

    /// Tear down the UI rendering resources
    fn shutdown_ui(&mut self);

    /// Start drawing into a viewport
    fn begin_drawing_viewport(&mut self, viewport: &ViewportHandle);

    /// Clear the viewport's surface to a solid color
    fn clear_surface(&mut self, viewport: &ViewportHandle, color: Color);

    /// Draw a UI frame snapshot
    fn draw_ui(&mut self, draw_data: &UiDrawData);

    /// Finish drawing into a viewport, optionally presenting it
    fn end_drawing_viewport(&mut self, viewport: &ViewportHandle, present: bool, vsync: bool);

    /// Open a labelled frame capture region, for profiling tools
    fn begin_frame_marker(&mut self, label: &str);

    /// Close the current frame capture region
    fn end_frame_marker(&mut self);
}
