//! Draw seam toward the external renderer.
//!
//! The core never renders. Systems that want to visualise simulation state
//! (collider and obstacle outlines) stroke rectangles onto a [`Canvas`]
//! implemented by whichever renderer the engine is hosted in.

use bonsai_math::{Rect, Rgba};

/// A surface that can outline rectangles.
pub trait Canvas {
    /// Outline `rect` with a one-pixel stroke of `color`.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba);
}

/// A [`Canvas`] that records every stroke, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct ShapeRecorder {
    /// Recorded strokes in draw order.
    pub shapes: Vec<(Rect, Rgba)>,
}

impl ShapeRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard recorded strokes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Canvas for ShapeRecorder {
    fn stroke_rect(&mut self, rect: Rect, color: Rgba) {
        self.shapes.push((rect, color));
    }
}
