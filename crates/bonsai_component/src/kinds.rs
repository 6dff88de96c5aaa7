//! Built-in component kinds consumed by the collision engine and physics.
//!
//! - [`Position`] / [`Velocity`] — 2D coordinate and per-second motion.
//! - [`Size`] — visual width/height plus four padding offsets that widen
//!   the effective physics rectangle.
//! - [`Collider`] — a group tag plus a single rectangle or a cross shape.
//! - [`Solid`] — marks a static obstacle.
//! - [`SolidExclude`] — names a group whose solids this entity ignores.
//! - [`Marker`] — a presence-only tag.

use bonsai_math::{DVec2, Rect};
use serde::{Deserialize, Serialize};

/// Conventional component names used by the core.
pub mod names {
    pub const POSITION: &str = "position";
    pub const VELOCITY: &str = "velocity";
    pub const SIZE: &str = "size";
    pub const COLLIDER: &str = "collider";
    pub const SOLID: &str = "solid";
    pub const SOLID_EXCLUDE: &str = "solidexclude";
    /// Entities carrying this component survive `remove_transient`.
    pub const PERSISTENT: &str = "persistent";
}

/// A 2D world-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn as_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// A 2D velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visual size plus directional padding.
///
/// The padding widens (positive) or shrinks (negative) the effective
/// rectangle used for static-obstacle resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Size {
    /// A size with no padding.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            top: 0.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
        }
    }

    /// Set the four padding offsets.
    #[must_use]
    pub const fn with_padding(mut self, top: f64, bottom: f64, left: f64, right: f64) -> Self {
        self.top = top;
        self.bottom = bottom;
        self.left = left;
        self.right = right;
        self
    }

    /// The effective rectangle when the entity sits at `(x, y)`.
    #[must_use]
    pub fn effective_rect(&self, x: f64, y: f64) -> Rect {
        Rect::new(
            DVec2::new(x - self.left, y - self.top),
            DVec2::new(x + self.width + self.right, y + self.height + self.bottom),
        )
    }
}

/// The two bars of a cross-shaped collider. Both are centred on the
/// collider's anchor (`position + offset`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cross {
    /// Width and height of the horizontal bar.
    pub horizontal: DVec2,
    /// Width and height of the vertical bar.
    pub vertical: DVec2,
}

/// A collision footprint tagged with a group name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Group tag used to select collision handlers.
    pub group: String,
    /// Offset from the entity position.
    pub offset: DVec2,
    /// Width of the single rectangle.
    pub width: f64,
    /// Height of the single rectangle.
    pub height: f64,
    /// Cross decomposition, if this collider is cross-shaped.
    pub cross: Option<Cross>,
}

impl Collider {
    /// A single-rectangle collider anchored at the entity position.
    #[must_use]
    pub fn rect(group: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            group: group.into(),
            offset: DVec2::ZERO,
            width,
            height,
            cross: None,
        }
    }

    /// A cross-shaped collider from horizontal and vertical bar sizes.
    #[must_use]
    pub fn cross(group: impl Into<String>, horizontal: DVec2, vertical: DVec2) -> Self {
        Self {
            group: group.into(),
            offset: DVec2::ZERO,
            width: 0.0,
            height: 0.0,
            cross: Some(Cross {
                horizontal,
                vertical,
            }),
        }
    }

    /// Set the offset from the entity position.
    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = DVec2::new(x, y);
        self
    }

    /// Returns `true` if this collider is cross-shaped.
    #[must_use]
    pub fn is_cross(&self) -> bool {
        self.cross.is_some()
    }

    /// The single offset rectangle for an entity at `position`.
    #[must_use]
    pub fn rect_at(&self, position: Position) -> Rect {
        Rect::from_origin_size(
            position.as_vec() + self.offset,
            DVec2::new(self.width, self.height),
        )
    }

    /// The horizontal and vertical bars for an entity at `position`, if
    /// cross-shaped.
    #[must_use]
    pub fn bars_at(&self, position: Position) -> Option<(Rect, Rect)> {
        let anchor = position.as_vec() + self.offset;
        self.cross.map(|c| {
            (
                Rect::from_center_size(anchor, c.horizontal),
                Rect::from_center_size(anchor, c.vertical),
            )
        })
    }
}

/// Marks an entity as a static obstacle for the physics system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solid;

/// Names a group component; solids carrying it are ignored by this entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidExclude(pub String);

impl SolidExclude {
    #[must_use]
    pub fn new(group: impl Into<String>) -> Self {
        Self(group.into())
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.0
    }
}

/// A presence-only tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker;
