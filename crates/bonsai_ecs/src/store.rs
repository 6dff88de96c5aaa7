//! Per-entity component storage.
//!
//! A [`ComponentStore`] holds one entity's components keyed by name. It is
//! backed by a [`DashMap`], so readers and writers on different threads may
//! touch the same store concurrently. Each name is updated atomically; there
//! is no multi-key transaction.

use std::collections::BTreeMap;

use dashmap::DashMap;

use bonsai_component::ComponentValue;

/// One entity's components.
#[derive(Debug, Default)]
pub struct ComponentStore {
    components: DashMap<String, ComponentValue>,
}

impl ComponentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a component, returning the previous value.
    pub fn set(&self, name: &str, value: ComponentValue) -> Option<ComponentValue> {
        self.components.insert(name.to_string(), value)
    }

    /// Clone out a component value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ComponentValue> {
        self.components.get(name).map(|v| v.value().clone())
    }

    /// Remove a component, returning it if present.
    pub fn remove(&self, name: &str) -> Option<ComponentValue> {
        self.components.remove(name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Copy every component into an ordered map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, ComponentValue> {
        self.components
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Build a store from an ordered map.
    #[must_use]
    pub fn from_map(map: BTreeMap<String, ComponentValue>) -> Self {
        Self {
            components: map.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bonsai_component::{Component, Position};

    use super::*;

    #[test]
    fn test_set_overwrites() {
        let store = ComponentStore::new();
        assert!(store.set("position", Position::new(1.0, 1.0).into_value()).is_none());
        let prev = store.set("position", Position::new(2.0, 2.0).into_value());
        assert_eq!(prev, Some(Position::new(1.0, 1.0).into_value()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("position"), Some(Position::new(2.0, 2.0).into_value()));
    }

    #[test]
    fn test_remove_and_absence() {
        let store = ComponentStore::new();
        store.set("solid", ComponentValue::Solid);
        assert!(store.contains("solid"));
        assert_eq!(store.remove("solid"), Some(ComponentValue::Solid));
        assert!(store.get("solid").is_none());
        assert!(store.remove("solid").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_map_roundtrip_is_sorted() {
        let store = ComponentStore::new();
        store.set("b", ComponentValue::Marker);
        store.set("a", ComponentValue::Flag(true));
        assert_eq!(store.names(), vec!["a".to_string(), "b".to_string()]);
        let restored = ComponentStore::from_map(store.to_map());
        assert_eq!(restored.to_map(), store.to_map());
    }
}
