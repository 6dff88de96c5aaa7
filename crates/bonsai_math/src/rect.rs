//! Axis-aligned rectangles.
//!
//! Every overlap test in the simulation core reduces to [`Rect::overlaps`]:
//! two rectangles intersect iff they overlap on both axes, using strict
//! inequalities so that rectangles sharing an edge do not touch.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle described by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (smallest x and y).
    pub min: DVec2,
    /// Bottom-right corner (largest x and y).
    pub max: DVec2,
}

impl Rect {
    /// Create a rectangle from its two corners.
    #[must_use]
    pub const fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from an origin and a width/height.
    #[must_use]
    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Create a rectangle of the given size centred on `center`.
    #[must_use]
    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        Self::from_origin_size(center - size / 2.0, size)
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Strict AABB intersection test.
    ///
    /// ```text
    /// a.min.x < b.max.x && a.max.x > b.min.x &&
    /// a.min.y < b.max.y && a.max.y > b.min.y
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size(DVec2::new(x, y), DVec2::new(w, h))
    }

    #[test]
    fn test_overlapping_rects() {
        assert!(rect(0.0, 0.0, 10.0, 10.0).overlaps(&rect(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        // Strict comparisons: touching edges do not count.
        assert!(!rect(0.0, 0.0, 10.0, 10.0).overlaps(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).overlaps(&rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_separated_on_one_axis() {
        // Overlap on x but not on y.
        assert!(!rect(0.0, 0.0, 10.0, 10.0).overlaps(&rect(2.0, 30.0, 4.0, 4.0)));
    }

    #[test]
    fn test_containment_overlaps() {
        assert!(rect(0.0, 0.0, 100.0, 100.0).overlaps(&rect(40.0, 40.0, 1.0, 1.0)));
    }

    #[test]
    fn test_center_size() {
        let r = Rect::from_center_size(DVec2::new(10.0, 10.0), DVec2::new(4.0, 2.0));
        assert_eq!(r.min, DVec2::new(8.0, 9.0));
        assert_eq!(r.max, DVec2::new(12.0, 11.0));
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 2.0);
    }
}
