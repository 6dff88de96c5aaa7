//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u32` identifier with no inherent data.
//! Identifiers are handed out by a single [`EntityAllocator`] per registry
//! and are never reused within a process lifetime.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// An entity carries no data of its own; its components live in the
/// registry under its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u32);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u32` identifier.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` identifier.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity IDs.
///
/// The counter is atomic so that entities may be created from any thread
/// holding a shared reference to the owning registry.
#[derive(Debug)]
pub struct EntityAllocator {
    last_id: AtomicU32,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_id: AtomicU32::new(0),
        }
    }

    /// Allocates a fresh entity ID.
    pub fn allocate(&self) -> Entity {
        Entity(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Returns the last ID handed out (0 if none), which is also the number
    /// of entities allocated so far.
    #[must_use]
    pub fn last(&self) -> u32 {
        self.last_id.load(Ordering::Relaxed)
    }

    /// Reset the counter so the next allocation returns `last + 1`.
    ///
    /// Used when restoring a registry snapshot.
    pub fn restore(&self, last: u32) {
        self.last_id.store(last, Ordering::Relaxed);
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
