//! MessagePack snapshots of registry state.
//!
//! Two blob shapes are supported:
//!
//! - [`RegistrySnapshot`] — the whole registry: allocator counter, every
//!   entity with its components and stable identifier.
//! - [`EntitySnapshot`] — a single entity, addressed by stable identifier
//!   when it has one. Used for save slots and for shipping individual
//!   entity updates over a network channel.
//!
//! Decoding always fully parses and validates a blob before touching the
//! registry, so a malformed blob leaves state unchanged.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use bonsai_component::{ComponentValue, Entity};

use crate::error::EcsError;
use crate::registry::EntityRegistry;
use crate::store::ComponentStore;

/// One entity: id, optional stable identifier, and its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// The entity id at encode time. Ignored by [`EntityRegistry::decode_entity`].
    pub id: Entity,
    /// Stable identifier, if the entity has one.
    pub ident: Option<String>,
    /// Components keyed by name.
    pub components: BTreeMap<String, ComponentValue>,
}

/// The complete registry state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Last id handed out by the allocator.
    pub next_id: u32,
    /// Every live entity, in ascending id order.
    pub entities: Vec<EntitySnapshot>,
}

impl RegistrySnapshot {
    /// Check the registry invariants a snapshot must satisfy before it can
    /// be applied.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidSnapshot`] describing the first violation.
    pub fn validate(&self) -> Result<(), EcsError> {
        let mut ids = HashSet::new();
        let mut idents = HashSet::new();
        for entity in &self.entities {
            if !entity.id.is_valid() {
                return Err(EcsError::InvalidSnapshot("contains the invalid entity id".into()));
            }
            if entity.id.id() > self.next_id {
                return Err(EcsError::InvalidSnapshot(format!(
                    "{} is beyond the allocator counter {}",
                    entity.id, self.next_id
                )));
            }
            if !ids.insert(entity.id) {
                return Err(EcsError::InvalidSnapshot(format!("duplicate {}", entity.id)));
            }
            if let Some(ident) = &entity.ident
                && !idents.insert(ident.as_str())
            {
                return Err(EcsError::InvalidSnapshot(format!("duplicate ident '{ident}'")));
            }
        }
        Ok(())
    }
}

/// Encode a value to MessagePack bytes with named fields.
///
/// # Errors
///
/// Returns [`EcsError::Encode`] if serialisation fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EcsError> {
    rmp_serde::to_vec_named(value).map_err(EcsError::Encode)
}

/// Decode a value from MessagePack bytes.
///
/// # Errors
///
/// Returns [`EcsError::Decode`] if deserialisation fails.
pub fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, EcsError> {
    rmp_serde::from_slice(bytes).map_err(EcsError::Decode)
}

impl EntityRegistry {
    /// Capture one entity.
    #[must_use]
    pub fn entity_snapshot(&self, entity: Entity) -> Option<EntitySnapshot> {
        let store = self.store(entity)?;
        Some(EntitySnapshot {
            id: entity,
            ident: self.ident_of(entity),
            components: store.to_map(),
        })
    }

    /// Capture the complete registry state.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let next_id = self.allocator.last();
        let entities = self
            .entities()
            .into_iter()
            .filter_map(|e| self.entity_snapshot(e))
            .collect();
        RegistrySnapshot { next_id, entities }
    }

    /// Replace the registry state with a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidSnapshot`] if the snapshot breaks an
    /// invariant; the registry is left unchanged in that case.
    pub fn restore(&mut self, snapshot: RegistrySnapshot) -> Result<(), EcsError> {
        snapshot.validate()?;

        self.entities.clear();
        self.idents.clear();
        self.entity_idents.clear();
        self.allocator.restore(snapshot.next_id);

        let count = snapshot.entities.len();
        for entity in snapshot.entities {
            self.entities
                .insert(entity.id, Arc::new(ComponentStore::from_map(entity.components)));
            if let Some(ident) = entity.ident {
                self.entity_idents.insert(entity.id, ident.clone());
                self.idents.insert(ident, entity.id);
            }
        }
        debug!(entities = count, next_id = snapshot.next_id, "restored registry");
        Ok(())
    }

    /// Encode the complete registry state.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::Encode`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, EcsError> {
        encode(&self.snapshot())
    }

    /// Decode and apply a blob produced by [`EntityRegistry::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::Decode`] for malformed bytes and
    /// [`EcsError::InvalidSnapshot`] for a well-formed but inconsistent
    /// snapshot. Either way the registry is unchanged.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<(), EcsError> {
        let snapshot: RegistrySnapshot = decode(bytes)?;
        self.restore(snapshot)
    }

    /// Encode a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotFound`] for an unknown entity and
    /// [`EcsError::Encode`] if serialisation fails.
    pub fn encode_entity(&self, entity: Entity) -> Result<Vec<u8>, EcsError> {
        let snapshot = self
            .entity_snapshot(entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        encode(&snapshot)
    }

    /// Decode a single entity blob and apply it.
    ///
    /// If the blob carries a stable identifier that is already bound, its
    /// components are merged into that entity (overwriting same-named
    /// components). Otherwise a new entity is created, bound to the
    /// identifier if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::Decode`] for malformed bytes; the registry is
    /// unchanged.
    pub fn decode_entity(&self, bytes: &[u8]) -> Result<Entity, EcsError> {
        let snapshot: EntitySnapshot = decode(bytes)?;
        let target = match snapshot.ident.as_deref().filter(|i| !i.is_empty()) {
            Some(ident) => self
                .entity_by_ident(ident)
                .unwrap_or_else(|| self.create_entity_with_ident(ident)),
            None => self.create_entity(),
        };
        self.set_components(target, snapshot.components);
        debug!(entity = %target, "decoded entity");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use bonsai_component::{Collider, Component, Position, Size, Solid, SolidExclude, Velocity};

    use super::*;

    fn populated() -> (EntityRegistry, Entity, Entity) {
        let registry = EntityRegistry::new();
        let player = registry.create_entity_with_ident("player");
        registry.insert(player, Position::new(4.0, 8.0));
        registry.insert(player, Velocity::new(1.0, 0.0));
        registry.insert(player, Collider::rect("player", 8.0, 8.0));
        registry.insert(player, SolidExclude::new("ghost"));
        registry.mark_persistent(player);
        let wall = registry.create_entity();
        registry.insert(wall, Position::new(32.0, 0.0));
        registry.insert(wall, Size::new(16.0, 16.0));
        registry.insert(wall, Solid);
        (registry, player, wall)
    }

    #[test]
    fn test_registry_encode_decode_restores_state() {
        let (registry, player, wall) = populated();
        let bytes = registry.encode().unwrap();

        let mut restored = EntityRegistry::new();
        restored.create_entity();
        restored.decode(&bytes).unwrap();

        assert_eq!(restored.snapshot(), registry.snapshot());
        assert_eq!(restored.entity_by_ident("player"), Some(player));
        assert!(restored.has_component(wall, "solid"));
        // The allocator continues from the saved counter.
        assert!(restored.create_entity() > wall);
    }

    #[test]
    fn test_malformed_registry_blob_leaves_state_unchanged() {
        let (mut registry, _, _) = populated();
        let before = registry.snapshot();
        let result = registry.decode(&[0xFF, 0x00, 0x13]);
        assert!(matches!(result, Err(EcsError::Decode(_))));
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_invalid_snapshot_rejected() {
        let (mut registry, _, _) = populated();
        let before = registry.snapshot();

        let mut bad = before.clone();
        bad.entities.push(bad.entities[0].clone());
        let bytes = encode(&bad).unwrap();
        assert!(matches!(registry.decode(&bytes), Err(EcsError::InvalidSnapshot(_))));

        let mut bad = before.clone();
        bad.next_id = 0;
        assert!(matches!(registry.restore(bad), Err(EcsError::InvalidSnapshot(_))));

        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_entity_decode_updates_by_ident() {
        let (registry, player, _) = populated();
        let remote = EntityRegistry::new();
        let copy = remote.decode_entity(&registry.encode_entity(player).unwrap()).unwrap();
        assert_eq!(remote.entity_by_ident("player"), Some(copy));

        // A later update carrying only a new position merges into the copy.
        registry.insert(player, Position::new(100.0, 8.0));
        registry.remove_component(player, "velocity");
        let update = registry.encode_entity(player).unwrap();
        let again = remote.decode_entity(&update).unwrap();

        assert_eq!(again, copy);
        assert_eq!(remote.len(), 1);
        assert_eq!(
            remote.fetch::<Position>(copy).unwrap(),
            Some(Position::new(100.0, 8.0))
        );
        // Merge semantics: components absent from the blob are kept.
        assert!(remote.has_component(copy, "velocity"));
    }

    #[test]
    fn test_entity_decode_without_ident_creates_new() {
        let (registry, _, wall) = populated();
        let blob = registry.encode_entity(wall).unwrap();
        let a = registry.decode_entity(&blob).unwrap();
        let b = registry.decode_entity(&blob).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, wall);
        assert!(registry.has_component(a, "solid"));
    }

    #[test]
    fn test_encode_unknown_entity_fails() {
        let registry = EntityRegistry::new();
        assert!(matches!(
            registry.encode_entity(Entity::from_raw(3)),
            Err(EcsError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_entity_blob_creates_nothing() {
        let registry = EntityRegistry::new();
        assert!(registry.decode_entity(&[0xC1]).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_components_are_dynamic_values() {
        let (registry, player, _) = populated();
        let snap = registry.entity_snapshot(player).unwrap();
        assert_eq!(
            snap.components.get("position"),
            Some(&Position::new(4.0, 8.0).into_value())
        );
        assert_eq!(snap.ident.as_deref(), Some("player"));
    }
}
