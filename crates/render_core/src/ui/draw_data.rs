//! UI frame snapshot payload
//!
//! An immediate-mode UI rebuilds its draw lists every tick and may free or
//! overwrite them the moment the next tick begins. The types here are the
//! deep-copied snapshot of one frame's output, safe for the render thread
//! to consume arbitrarily later. `clone_from` implementations reuse the
//! destination's allocations, so a warm ring slot copies without heap
//! traffic.

use bytemuck::{Pod, Zeroable};

/// One UI vertex as uploaded to the GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct UiDrawVertex {
    /// Screen-space position in pixels
    pub position: [f32; 2],
    /// Texture coordinates
    pub uv: [f32; 2],
    /// Packed RGBA color
    pub color: [u8; 4],
}

/// One draw call within a draw list
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiDrawCall {
    /// Scissor rectangle as (min x, min y, max x, max y)
    pub clip_rect: [f32; 4],
    /// Backend texture identifier
    pub texture_id: u64,
    /// First index for this call
    pub index_offset: u32,
    /// Number of indices consumed by this call
    pub element_count: u32,
}

/// A contiguous batch of UI geometry sharing one vertex/index buffer
#[derive(Debug, Default, PartialEq)]
pub struct UiDrawList {
    /// Vertex buffer contents
    pub vertices: Vec<UiDrawVertex>,
    /// Index buffer contents
    pub indices: Vec<u16>,
    /// Draw calls into the buffers above
    pub calls: Vec<UiDrawCall>,
}

impl Clone for UiDrawList {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
            calls: self.calls.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.vertices.clone_from(&source.vertices);
        self.indices.clone_from(&source.indices);
        self.calls.clone_from(&source.calls);
    }
}

/// A full frame of UI draw output for one window
#[derive(Debug, Default, PartialEq)]
pub struct UiDrawData {
    /// Top-left of the output area in screen coordinates
    pub display_pos: [f32; 2],
    /// Size of the output area in pixels
    pub display_size: [f32; 2],
    /// Draw lists in submission order
    pub lists: Vec<UiDrawList>,
}

impl Clone for UiDrawData {
    fn clone(&self) -> Self {
        Self {
            display_pos: self.display_pos,
            display_size: self.display_size,
            lists: self.lists.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.display_pos = source.display_pos;
        self.display_size = source.display_size;
        self.lists.clone_from(&source.lists);
    }
}

impl UiDrawData {
    /// Total vertices across all draw lists
    #[must_use]
    pub fn total_vertex_count(&self) -> usize {
        self.lists.iter().map(|list| list.vertices.len()).sum()
    }

    /// Total indices across all draw lists
    #[must_use]
    pub fn total_index_count(&self) -> usize {
        self.lists.iter().map(|list| list.indices.len()).sum()
    }

    /// Drop all draw lists, keeping allocations for the next frame
    pub fn clear(&mut self) {
        for list in &mut self.lists {
            list.vertices.clear();
            list.indices.clear();
            list.calls.clear();
        }
        self.lists.clear();
    }
}
