//! The entity registry.
//!
//! [`EntityRegistry`] owns entity allocation, the stable-identifier mapping
//! used for network and save addressing, entity lifetime, and name-keyed
//! component access. Every operation takes `&self`: the maps are
//! [`DashMap`]s, so the registry can be shared by reference across the
//! parallel per-entity physics tasks.
//!
//! ## Consistency
//!
//! Each component name is read and written atomically. Nothing spans more
//! than one key: a task updating entity X's `velocity` may race with a
//! task reading it, and the reader sees either the old or the new value.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace, warn};

use bonsai_component::{
    Component, ComponentError, ComponentQuery, ComponentValue, Entity, EntityAllocator, Marker,
    names,
};

use crate::store::ComponentStore;

/// Entity identity, lifetime, and component storage.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Entity ID allocator.
    pub(crate) allocator: EntityAllocator,
    /// One component store per live entity.
    pub(crate) entities: DashMap<Entity, Arc<ComponentStore>>,
    /// Stable identifier to entity.
    pub(crate) idents: DashMap<String, Entity>,
    /// Entity to stable identifier.
    pub(crate) entity_idents: DashMap<Entity, String>,
}

impl EntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Allocate a fresh entity with an empty component store.
    pub fn create_entity(&self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, Arc::new(ComponentStore::new()));
        debug!(%entity, "created entity");
        entity
    }

    /// Allocate a fresh entity and bind it to a stable identifier.
    pub fn create_entity_with_ident(&self, ident: &str) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, Arc::new(ComponentStore::new()));
        self.bind_ident(entity, ident);
        debug!(%entity, ident, "created entity");
        entity
    }

    /// Bind `ident` to `entity`, replacing any previous binding of either.
    ///
    /// Returns `false` (and does nothing) if the entity is unknown.
    pub fn set_ident(&self, entity: Entity, ident: &str) -> bool {
        if !self.contains(entity) {
            warn!(%entity, ident, "cannot set ident on unknown entity");
            return false;
        }
        self.bind_ident(entity, ident);
        true
    }

    fn bind_ident(&self, entity: Entity, ident: &str) {
        if let Some(old_ident) = self.entity_idents.insert(entity, ident.to_string())
            && old_ident != ident
        {
            self.idents.remove_if(&old_ident, |_, e| *e == entity);
        }
        if let Some(previous) = self.idents.insert(ident.to_string(), entity)
            && previous != entity
        {
            self.entity_idents.remove(&previous);
            debug!(ident, from = %previous, to = %entity, "rebound ident");
        }
    }

    /// Remove an entity, its component store, and its ident mapping.
    ///
    /// Returns `true` if the entity existed.
    pub fn remove_entity(&self, entity: Entity) -> bool {
        if self.entities.remove(&entity).is_none() {
            return false;
        }
        if let Some((_, ident)) = self.entity_idents.remove(&entity) {
            self.idents.remove_if(&ident, |_, e| *e == entity);
        }
        debug!(%entity, "removed entity");
        true
    }

    /// Remove every entity that lacks a `persistent` component.
    ///
    /// Returns the number of entities removed.
    pub fn remove_transient(&self) -> usize {
        let transient = self.query_filtered(&ComponentQuery::new().without(names::PERSISTENT));
        let removed = transient
            .into_iter()
            .filter(|&e| self.remove_entity(e))
            .count();
        debug!(removed, "removed transient entities");
        removed
    }

    /// Attach the `persistent` marker so the entity survives
    /// [`EntityRegistry::remove_transient`].
    pub fn mark_persistent(&self, entity: Entity) -> bool {
        self.set_component(entity, names::PERSISTENT, Marker)
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Look up an entity by stable identifier.
    #[must_use]
    pub fn entity_by_ident(&self, ident: &str) -> Option<Entity> {
        self.idents.get(ident).map(|e| *e.value())
    }

    /// Look up the stable identifier of an entity.
    #[must_use]
    pub fn ident_of(&self, entity: Entity) -> Option<String> {
        self.entity_idents.get(&entity).map(|i| i.value().clone())
    }

    /// All live entities in ascending id order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.entities.iter().map(|e| *e.key()).collect();
        all.sort();
        all
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clone out the component store handle for an entity.
    ///
    /// The outer map guard is released before returning.
    #[must_use]
    pub fn store(&self, entity: Entity) -> Option<Arc<ComponentStore>> {
        self.entities.get(&entity).map(|s| Arc::clone(s.value()))
    }

    // -- Component operations --

    /// Set a component on an entity, overwriting any value under `name`.
    ///
    /// Setting on an unknown entity is a no-op that logs a warning and
    /// returns `false`.
    pub fn set_component(&self, entity: Entity, name: &str, value: impl Into<ComponentValue>) -> bool {
        let Some(store) = self.store(entity) else {
            warn!(%entity, component = name, "entity does not exist");
            return false;
        };
        store.set(name, value.into());
        trace!(%entity, component = name, "set component");
        true
    }

    /// Set several components at once.
    pub fn set_components<S, I>(&self, entity: Entity, components: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, ComponentValue)>,
    {
        let Some(store) = self.store(entity) else {
            warn!(%entity, "entity does not exist");
            return false;
        };
        for (name, value) in components {
            store.set(name.as_ref(), value);
        }
        true
    }

    /// Set a component under its type's conventional name.
    pub fn insert<T: Component>(&self, entity: Entity, value: T) -> bool {
        self.set_component(entity, T::type_name(), value.into_value())
    }

    /// Get a component value. Absent entity or name yields `None`.
    #[must_use]
    pub fn get_component(&self, entity: Entity, name: &str) -> Option<ComponentValue> {
        self.store(entity)?.get(name)
    }

    /// Get a typed component.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::KindMismatch`] if `name` holds a different
    /// kind than `T`. Absence is `Ok(None)`.
    pub fn get<T: Component>(&self, entity: Entity, name: &str) -> Result<Option<T>, ComponentError> {
        self.get_component(entity, name)
            .map(|v| T::try_from_value(name, &v))
            .transpose()
    }

    /// Get a typed component under its type's conventional name.
    ///
    /// # Errors
    ///
    /// See [`EntityRegistry::get`].
    pub fn fetch<T: Component>(&self, entity: Entity) -> Result<Option<T>, ComponentError> {
        self.get(entity, T::type_name())
    }

    /// Remove a component, returning it if it was present.
    pub fn remove_component(&self, entity: Entity, name: &str) -> Option<ComponentValue> {
        let removed = self.store(entity)?.remove(name);
        if removed.is_some() {
            trace!(%entity, component = name, "removed component");
        }
        removed
    }

    /// Remove several components.
    pub fn remove_components(&self, entity: Entity, names: &[&str]) {
        if let Some(store) = self.store(entity) {
            for name in names {
                store.remove(name);
            }
        }
    }

    /// Check if an entity has a specific component.
    #[must_use]
    pub fn has_component(&self, entity: Entity, name: &str) -> bool {
        self.store(entity).is_some_and(|s| s.contains(name))
    }

    /// Component names on an entity, sorted. Empty for unknown entities.
    #[must_use]
    pub fn component_names(&self, entity: Entity) -> Vec<String> {
        self.store(entity).map(|s| s.names()).unwrap_or_default()
    }

    // -- Query --

    /// Entities that carry every listed component, in ascending id order.
    #[must_use]
    pub fn query(&self, names: &[&str]) -> Vec<Entity> {
        self.query_filtered(&names.iter().copied().collect())
    }

    /// Entities matching a [`ComponentQuery`], in ascending id order.
    ///
    /// The live entity set is snapshotted first; each entity in the
    /// snapshot is then tested against its own store.
    #[must_use]
    pub fn query_filtered(&self, query: &ComponentQuery) -> Vec<Entity> {
        let snapshot: Vec<(Entity, Arc<ComponentStore>)> = self
            .entities
            .iter()
            .map(|e| (*e.key(), Arc::clone(e.value())))
            .collect();

        let mut matched: Vec<Entity> = snapshot
            .into_iter()
            .filter(|(_, store)| query.matches(|name| store.contains(name)))
            .map(|(entity, _)| entity)
            .collect();
        matched.sort();
        matched
    }
}

#[cfg(test)]
mod tests {
    use bonsai_component::{ComponentKind, Position, Size, Solid, Velocity};

    use super::*;

    #[test]
    fn test_ids_strictly_increasing() {
        let registry = EntityRegistry::new();
        let ids: Vec<Entity> = (0..50).map(|_| registry.create_entity()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(registry.len(), 50);
    }

    #[test]
    fn test_ids_never_reused_after_removal() {
        let registry = EntityRegistry::new();
        let a = registry.create_entity();
        assert!(registry.remove_entity(a));
        let b = registry.create_entity();
        assert!(b > a);
    }

    #[test]
    fn test_ident_mapping() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity_with_ident("player-1");
        assert_eq!(registry.entity_by_ident("player-1"), Some(e));
        assert_eq!(registry.ident_of(e).as_deref(), Some("player-1"));
        assert!(registry.entity_by_ident("nobody").is_none());
    }

    #[test]
    fn test_ident_rebind_moves_binding() {
        let registry = EntityRegistry::new();
        let a = registry.create_entity_with_ident("door");
        let b = registry.create_entity_with_ident("door");
        assert_eq!(registry.entity_by_ident("door"), Some(b));
        assert!(registry.ident_of(a).is_none());
        // Removing the old holder must not drop the new binding.
        registry.remove_entity(a);
        assert_eq!(registry.entity_by_ident("door"), Some(b));
    }

    #[test]
    fn test_set_ident_replaces_previous_ident() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity_with_ident("old");
        assert!(registry.set_ident(e, "new"));
        assert!(registry.entity_by_ident("old").is_none());
        assert_eq!(registry.entity_by_ident("new"), Some(e));
        assert!(!registry.set_ident(Entity::from_raw(999), "x"));
    }

    #[test]
    fn test_set_on_unknown_entity_is_noop() {
        let registry = EntityRegistry::new();
        assert!(!registry.set_component(Entity::from_raw(7), "position", Position::new(0.0, 0.0)));
        assert!(registry.is_empty());
        assert!(registry.get_component(Entity::from_raw(7), "position").is_none());
    }

    #[test]
    fn test_get_set_remove_has() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity();
        assert!(registry.insert(e, Position::new(1.0, 2.0)));
        assert!(registry.has_component(e, "position"));
        assert_eq!(registry.fetch::<Position>(e).unwrap(), Some(Position::new(1.0, 2.0)));

        registry.insert(e, Position::new(3.0, 4.0));
        assert_eq!(registry.fetch::<Position>(e).unwrap(), Some(Position::new(3.0, 4.0)));

        assert!(registry.remove_component(e, "position").is_some());
        assert!(!registry.has_component(e, "position"));
        assert_eq!(registry.fetch::<Position>(e).unwrap(), None);
        assert!(registry.remove_component(e, "position").is_none());
    }

    #[test]
    fn test_typed_get_kind_mismatch() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity();
        registry.set_component(e, "velocity", Position::new(0.0, 0.0));
        let err = registry.fetch::<Velocity>(e).unwrap_err();
        assert!(matches!(
            err,
            ComponentError::KindMismatch {
                expected: ComponentKind::Velocity,
                found: ComponentKind::Position,
                ..
            }
        ));
    }

    #[test]
    fn test_bulk_set_and_remove() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity();
        registry.set_components(
            e,
            [
                ("position", Position::new(0.0, 0.0).into_value()),
                ("size", Size::new(1.0, 1.0).into_value()),
                ("solid", Solid.into_value()),
            ],
        );
        assert_eq!(registry.component_names(e), vec!["position", "size", "solid"]);
        registry.remove_components(e, &["size", "solid"]);
        assert_eq!(registry.component_names(e), vec!["position"]);
    }

    #[test]
    fn test_query_requires_all_names() {
        let registry = EntityRegistry::new();
        let a = registry.create_entity();
        registry.insert(a, Position::new(0.0, 0.0));
        registry.insert(a, Velocity::ZERO);
        let b = registry.create_entity();
        registry.insert(b, Position::new(0.0, 0.0));
        let c = registry.create_entity();
        registry.insert(c, Velocity::ZERO);

        assert_eq!(registry.query(&["position", "velocity"]), vec![a]);
        assert_eq!(registry.query(&["position"]), vec![a, b]);
        assert_eq!(registry.query(&[]), vec![a, b, c]);
        assert!(registry.query(&["collider"]).is_empty());
    }

    #[test]
    fn test_query_reflects_component_changes() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity();
        assert!(registry.query(&["solid"]).is_empty());
        registry.insert(e, Solid);
        assert_eq!(registry.query(&["solid"]), vec![e]);
        registry.remove_component(e, "solid");
        assert!(registry.query(&["solid"]).is_empty());
    }

    #[test]
    fn test_removal_is_final() {
        let registry = EntityRegistry::new();
        let e = registry.create_entity_with_ident("crate");
        registry.insert(e, Position::new(0.0, 0.0));
        assert!(registry.remove_entity(e));
        assert!(!registry.contains(e));
        assert!(registry.query(&["position"]).is_empty());
        assert!(registry.query(&[]).is_empty());
        assert!(registry.get_component(e, "position").is_none());
        assert!(registry.entity_by_ident("crate").is_none());
        assert!(!registry.remove_entity(e));
    }

    #[test]
    fn test_remove_transient_keeps_persistent() {
        let registry = EntityRegistry::new();
        let player = registry.create_entity();
        registry.mark_persistent(player);
        let tile = registry.create_entity();
        let enemy = registry.create_entity();

        assert_eq!(registry.remove_transient(), 2);
        assert!(registry.contains(player));
        assert!(!registry.contains(tile));
        assert!(!registry.contains(enemy));
    }

    #[test]
    fn test_concurrent_writers_do_not_corrupt() {
        let registry = EntityRegistry::new();
        let entities: Vec<Entity> = (0..64).map(|_| registry.create_entity()).collect();
        std::thread::scope(|s| {
            for chunk in entities.chunks(16) {
                let registry = &registry;
                s.spawn(move || {
                    for &e in chunk {
                        for i in 0..100_u32 {
                            registry.insert(e, Position::new(f64::from(i), 0.0));
                            let seen = registry.query(&["position"]);
                            assert_eq!(seen.len(), 64);
                            assert!(seen.windows(2).all(|w| w[0] < w[1]));
                        }
                    }
                });
            }
        });
        for e in entities {
            assert_eq!(registry.fetch::<Position>(e).unwrap(), Some(Position::new(99.0, 0.0)));
        }
    }
}
