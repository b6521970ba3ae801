//! # Graphics Interface Surface
//!
//! The boundary between this crate and a real graphics API. The pipeline
//! never talks to a device directly; commands execute against the
//! [`GraphicsContext`] trait, whose contract (render thread only, begin/end
//! pairs per viewport) the command ordering upholds.

pub mod context;
pub mod headless;

pub use context::GraphicsContext;
pub use headless::{HeadlessContext, HeadlessCounters};

use std::sync::Arc;

/// An RGBA color value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel, 0.0..=1.0
    pub r: f32,
    /// Green channel, 0.0..=1.0
    pub g: f32,
    /// Blue channel, 0.0..=1.0
    pub b: f32,
    /// Alpha channel, 0.0..=1.0
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGBA components
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A renderable target: a window surface or a sub-region of one
///
/// Commands operate on viewports in begin/.../end pairs; relative enqueue
/// order across viewports determines draw layering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    label: String,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Create a viewport and wrap it in a shared handle
    ///
    /// Handles are atomically reference counted because both threads may
    /// hold one: the main thread in its window bookkeeping, the render
    /// thread inside a not-yet-executed command. The payload outlives
    /// whichever side drops last, so destruction cannot race.
    #[must_use]
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> ViewportHandle {
        Arc::new(Self {
            label: label.into(),
            width,
            height,
        })
    }

    /// Diagnostic label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Shared, atomically reference-counted viewport handle
pub type ViewportHandle = Arc<Viewport>;
