//! # bonsai_math
//!
//! Planar math types for the bonsai simulation core. Re-exports [`glam`]'s
//! double-precision vector and defines the axis-aligned [`Rect`] used by
//! collision detection and physics resolution.

pub mod color;
pub mod rect;

// Re-export glam types for convenience.
pub use glam::DVec2;

pub use color::Rgba;
pub use rect::Rect;
