//! The collision engine.
//!
//! Once per tick, after physics integration, [`CollisionEngine::update`]
//! walks every ordered pair of entities carrying `collider` + `position` +
//! `size`:
//!
//! 1. Look up the handler registered for `(group(e1), group(e2))`. Pairs
//!    without a handler are skipped without an overlap test.
//! 2. Skip the pair if its unordered combination was already evaluated
//!    this tick.
//! 3. Test overlap ([`colliders_overlap`]). A hit records the ordered key
//!    `(e1, e2)` and fires `enter` (new) or `stay` (already active).
//!
//! Keys active last tick but not this tick fire `leave` once and are
//! dropped. Entities are visited in ascending id order, so dispatch order
//! is deterministic.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, trace};

use bonsai_component::{Collider, Entity, Position, names};
use bonsai_ecs::{Canvas, EntityRegistry};
use bonsai_math::Rgba;

use crate::handler::CollisionHandler;
use crate::shape::colliders_overlap;

/// Ordered pair key: `(first, second)` in the order that produced the match.
pub type PairKey = (Entity, Entity);

/// Outline colour for single-rectangle colliders.
const RECT_OUTLINE: Rgba = Rgba::new(255, 0, 0, 120);

/// Outline colour for cross collider bars.
const CROSS_OUTLINE: Rgba = Rgba::new(0, 0, 255, 120);

type HandlerTable = HashMap<String, HashMap<String, CollisionHandler>>;

/// Group-pair collision detection and transition tracking.
#[derive(Debug, Default)]
pub struct CollisionEngine {
    /// Handlers keyed by first group, then second group.
    handlers: HandlerTable,
    /// Pairs that overlapped on the previous tick.
    active: BTreeSet<PairKey>,
}

fn lookup<'a>(handlers: &'a mut HandlerTable, a: &str, b: &str) -> Option<&'a mut CollisionHandler> {
    handlers.get_mut(a).and_then(|inner| inner.get_mut(b))
}

fn unordered(a: Entity, b: Entity) -> PairKey {
    if a < b { (a, b) } else { (b, a) }
}

impl CollisionEngine {
    /// Create an engine with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for colliders of `group_a` meeting `group_b`,
    /// replacing any previous one.
    ///
    /// The lookup is directional: a handler for `("player", "coin")` is not
    /// consulted for a pair first encountered as `(coin, player)`.
    pub fn add_handler(&mut self, group_a: &str, group_b: &str, handler: CollisionHandler) {
        self.handlers
            .entry(group_a.to_string())
            .or_default()
            .insert(group_b.to_string(), handler);
        debug!(group_a, group_b, "added collision handler");
    }

    /// Remove a handler. Returns `true` if one was registered.
    pub fn remove_handler(&mut self, group_a: &str, group_b: &str) -> bool {
        let Some(inner) = self.handlers.get_mut(group_a) else {
            return false;
        };
        let removed = inner.remove(group_b).is_some();
        if inner.is_empty() {
            self.handlers.remove(group_a);
        }
        removed
    }

    #[must_use]
    pub fn has_handler(&self, group_a: &str, group_b: &str) -> bool {
        self.handlers
            .get(group_a)
            .is_some_and(|inner| inner.contains_key(group_b))
    }

    /// Ordered keys of the pairs that overlapped on the last update.
    #[must_use]
    pub fn active_pairs(&self) -> Vec<PairKey> {
        self.active.iter().copied().collect()
    }

    /// Returns `true` if `(a, b)` overlapped on the last update.
    #[must_use]
    pub fn is_colliding(&self, a: Entity, b: Entity) -> bool {
        self.active.contains(&(a, b))
    }

    /// Forget every active pair without firing `leave`.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Run one detection pass and dispatch handlers.
    ///
    /// Both entities of a pair are re-read right before it is tested, so a
    /// handler that removes or moves an entity is seen by every later pair.
    pub fn update(&mut self, registry: &EntityRegistry) {
        let bodies = registry.query(&[names::COLLIDER, names::POSITION, names::SIZE]);
        let mut processed: HashSet<PairKey> = HashSet::new();
        let mut current: BTreeSet<PairKey> = BTreeSet::new();
        let mut tested = 0usize;

        for &e1 in &bodies {
            for &e2 in &bodies {
                if e1 == e2 {
                    continue;
                }
                let (Some((p1, c1)), Some((p2, c2))) = (read_body(registry, e1), read_body(registry, e2))
                else {
                    continue;
                };
                let Some(handler) = lookup(&mut self.handlers, &c1.group, &c2.group) else {
                    continue;
                };
                if !processed.insert(unordered(e1, e2)) {
                    continue;
                }
                tested += 1;
                if !colliders_overlap(p1, &c1, p2, &c2) {
                    continue;
                }

                let key = (e1, e2);
                current.insert(key);
                if self.active.contains(&key) {
                    handler.fire_stay(registry, e1, e2);
                } else {
                    debug!(a = %e1, b = %e2, "collision enter");
                    handler.fire_enter(registry, e1, e2);
                }
            }
        }

        let ended: Vec<PairKey> = self.active.difference(&current).copied().collect();
        for (e1, e2) in ended {
            let groups = registry
                .fetch::<Collider>(e1)
                .ok()
                .flatten()
                .zip(registry.fetch::<Collider>(e2).ok().flatten());
            let Some((c1, c2)) = groups else {
                trace!(a = %e1, b = %e2, "dropped pair without colliders");
                continue;
            };
            if let Some(handler) = lookup(&mut self.handlers, &c1.group, &c2.group) {
                debug!(a = %e1, b = %e2, "collision leave");
                handler.fire_leave(registry, e1, e2);
            }
        }

        trace!(
            bodies = bodies.len(),
            tested,
            active = current.len(),
            "collision pass complete"
        );
        self.active = current;
    }

    /// Outline every collider: single rectangles in red, cross bars in blue.
    pub fn draw_debug(&self, registry: &EntityRegistry, canvas: &mut dyn Canvas) {
        for entity in registry.query(&[names::COLLIDER, names::POSITION]) {
            let (Ok(Some(collider)), Ok(Some(position))) = (
                registry.fetch::<Collider>(entity),
                registry.fetch::<Position>(entity),
            ) else {
                continue;
            };
            match collider.bars_at(position) {
                Some((horizontal, vertical)) => {
                    canvas.stroke_rect(horizontal, CROSS_OUTLINE);
                    canvas.stroke_rect(vertical, CROSS_OUTLINE);
                }
                None => canvas.stroke_rect(collider.rect_at(position), RECT_OUTLINE),
            }
        }
    }
}

/// Current position and collider of a collidable entity.
///
/// `None` once the entity is gone or lost any of `collider`, `position`,
/// `size`. `size` is required for membership but not read.
fn read_body(registry: &EntityRegistry, entity: Entity) -> Option<(Position, Collider)> {
    if !registry.has_component(entity, names::SIZE) {
        return None;
    }
    match (
        registry.fetch::<Position>(entity),
        registry.fetch::<Collider>(entity),
    ) {
        (Ok(Some(position)), Ok(Some(collider))) => Some((position, collider)),
        (Err(err), _) | (_, Err(err)) => {
            debug!(%entity, %err, "skipping collider entity");
            None
        }
        _ => None,
    }
}
