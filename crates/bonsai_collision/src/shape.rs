//! Collider overlap test.
//!
//! A rect collider contributes its single offset rectangle. A cross
//! collider contributes its two bars, and the pair overlaps if either bar
//! overlaps the other entity's single rectangle.
//!
//! When the first collider is cross-shaped only its bars are tested, against
//! the second collider's single rectangle, even if the second is also a
//! cross. When only the second is cross-shaped, its bars are tested against
//! the first's rectangle.

use bonsai_component::{Collider, Position};

/// Returns `true` if the two colliders overlap at the given positions.
#[must_use]
pub fn colliders_overlap(p1: Position, c1: &Collider, p2: Position, c2: &Collider) -> bool {
    if let Some((horizontal, vertical)) = c1.bars_at(p1) {
        let other = c2.rect_at(p2);
        return horizontal.overlaps(&other) || vertical.overlaps(&other);
    }
    if let Some((horizontal, vertical)) = c2.bars_at(p2) {
        let other = c1.rect_at(p1);
        return horizontal.overlaps(&other) || vertical.overlaps(&other);
    }
    c1.rect_at(p1).overlaps(&c2.rect_at(p2))
}
