//! # bonsai_component
//!
//! Entity identifiers and component values for the simulation core, plus
//! the mapping from typed Rust values onto the name-keyed dynamic store.
//!
//! This crate provides:
//!
//! - [`Entity`] — opaque `u32` entity identifiers.
//! - [`EntityAllocator`] — monotonically increasing, thread-safe id allocator.
//! - [`Component`] trait — maps a Rust type to a [`ComponentKind`].
//! - [`ComponentValue`] — the tagged variant stored per component name.
//! - Built-in kinds: [`Position`], [`Velocity`], [`Size`], [`Collider`],
//!   [`Solid`], [`SolidExclude`], [`Marker`].
//! - [`ComponentQuery`] — component-signature query descriptor.

pub mod component;
pub mod entity;
pub mod kinds;
pub mod query;

pub use component::{Component, ComponentError, ComponentKind, ComponentValue};
pub use entity::{Entity, EntityAllocator};
pub use kinds::{Collider, Cross, Marker, Position, Size, Solid, SolidExclude, Velocity, names};
pub use query::ComponentQuery;
