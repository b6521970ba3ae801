//! Per-window UI snapshot handoff
//!
//! Each output window owns a snapshot ring. Once per UI tick the window
//! acquires the next slot, deep-copies the frame's draw data into it, and
//! enqueues the render command that will consume the slot and free it.

use bitflags::bitflags;
use std::sync::Arc;

use super::draw_data::UiDrawData;
use crate::pipeline::{CommandQueue, SnapshotRing};
use crate::rhi::{Color, ViewportHandle};

bitflags! {
    /// Per-window behavior flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UiWindowFlags: u32 {
        /// Skip the background clear before drawing the window's UI
        const NO_BACKGROUND_CLEAR = 1 << 0;
    }
}

/// One UI output window and its snapshot ring
///
/// The main window has no viewport of its own (the platform swapchain
/// presents it); child windows carry a viewport handle and get a full
/// begin / clear / draw / end command.
pub struct UiWindow {
    viewport: Option<ViewportHandle>,
    flags: UiWindowFlags,
    ring: SnapshotRing<UiDrawData>,
    /// Transient draw output being built for the current tick. Rebuilt
    /// every frame; only its deep copy in a ring slot crosses threads.
    current: UiDrawData,
}

impl UiWindow {
    pub(crate) fn new(
        viewport: Option<ViewportHandle>,
        flags: UiWindowFlags,
        ring: SnapshotRing<UiDrawData>,
    ) -> Self {
        Self {
            viewport,
            flags,
            ring,
            current: UiDrawData::default(),
        }
    }

    /// The window's viewport, if it is a child window
    #[must_use]
    pub fn viewport(&self) -> Option<&ViewportHandle> {
        self.viewport.as_ref()
    }

    /// This window's behavior flags
    #[must_use]
    pub fn flags(&self) -> UiWindowFlags {
        self.flags
    }

    /// Mutable access to the frame's in-progress draw output
    pub fn current_mut(&mut self) -> &mut UiDrawData {
        &mut self.current
    }

    /// The frame's in-progress draw output
    #[must_use]
    pub fn current(&self) -> &UiDrawData {
        &self.current
    }

    /// How often slot acquisition has waited on a stalled render thread
    #[must_use]
    pub fn starvation_count(&self) -> u64 {
        self.ring.starvation_count()
    }

    /// Snapshot the current draw output and enqueue its draw command
    ///
    /// Acquires the next ring slot (blocking if the render thread is
    /// behind by a full ring), deep-copies `current` into it, and enqueues
    /// the command that consumes the slot on the render thread. The
    /// transient `current` buffer is free to be rebuilt immediately.
    pub fn tick(&mut self, queue: &CommandQueue) {
        let handle = self.ring.acquire_next();
        handle.fill(&self.current);

        match &self.viewport {
            None => {
                queue.enqueue("draw_ui_main_window", move |ctx| {
                    handle.consume_and_release(|snapshot| {
                        ctx.draw_ui(snapshot);
                    });
                });
            }
            Some(viewport) => {
                let viewport = Arc::clone(viewport);
                let clear = !self.flags.contains(UiWindowFlags::NO_BACKGROUND_CLEAR);
                queue.enqueue("draw_ui_child_window", move |ctx| {
                    handle.consume_and_release(|snapshot| {
                        ctx.begin_drawing_viewport(&viewport);
                        if clear {
                            ctx.clear_surface(&viewport, Color::BLACK);
                        }
                        ctx.draw_ui(snapshot);
                        ctx.end_drawing_viewport(&viewport, true, false);
                    });
                });
            }
        }
    }
}
