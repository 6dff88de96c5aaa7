//! Collision handlers.

use bonsai_component::Entity;
use bonsai_ecs::EntityRegistry;

/// Callback invoked with the registry and the two entities, in the order
/// that produced the match.
pub type CollisionCallback = Box<dyn FnMut(&EntityRegistry, Entity, Entity) + Send>;

/// Reaction to two collider groups overlapping. Every callback is optional.
#[derive(Default)]
pub struct CollisionHandler {
    pub(crate) enter: Option<CollisionCallback>,
    pub(crate) stay: Option<CollisionCallback>,
    pub(crate) leave: Option<CollisionCallback>,
}

impl CollisionHandler {
    /// A handler with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired on the first tick a pair overlaps.
    #[must_use]
    pub fn on_enter(mut self, f: impl FnMut(&EntityRegistry, Entity, Entity) + Send + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    /// Fired on every later tick the pair still overlaps.
    #[must_use]
    pub fn on_stay(mut self, f: impl FnMut(&EntityRegistry, Entity, Entity) + Send + 'static) -> Self {
        self.stay = Some(Box::new(f));
        self
    }

    /// Fired once on the first tick the pair no longer overlaps.
    #[must_use]
    pub fn on_leave(mut self, f: impl FnMut(&EntityRegistry, Entity, Entity) + Send + 'static) -> Self {
        self.leave = Some(Box::new(f));
        self
    }

    pub(crate) fn fire_enter(&mut self, registry: &EntityRegistry, a: Entity, b: Entity) {
        if let Some(f) = self.enter.as_mut() {
            f(registry, a, b);
        }
    }

    pub(crate) fn fire_stay(&mut self, registry: &EntityRegistry, a: Entity, b: Entity) {
        if let Some(f) = self.stay.as_mut() {
            f(registry, a, b);
        }
    }

    pub(crate) fn fire_leave(&mut self, registry: &EntityRegistry, a: Entity, b: Entity) {
        if let Some(f) = self.leave.as_mut() {
            f(registry, a, b);
        }
    }
}

impl std::fmt::Debug for CollisionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionHandler")
            .field("enter", &self.enter.is_some())
            .field("stay", &self.stay.is_some())
            .field("leave", &self.leave.is_some())
            .finish()
    }
}
