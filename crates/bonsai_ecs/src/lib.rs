//! # bonsai_ecs
//!
//! The entity registry and system registry of the simulation core.
//!
//! This crate provides:
//!
//! - [`ComponentStore`] — one entity's name-keyed, concurrently accessible
//!   component map.
//! - [`EntityRegistry`] — entity identity, stable-identifier mapping,
//!   lifetime, component access, and signature queries.
//! - [`codec`] — MessagePack snapshots of the whole registry or one entity.
//! - [`System`] / [`SystemRegistry`] — insertion-ordered per-tick update and
//!   draw procedures.
//! - [`Canvas`] — the narrow draw seam toward an external renderer.
//! - [`EcsError`] — failures surfaced to callers (decode and lookup).

pub mod canvas;
pub mod codec;
pub mod error;
pub mod registry;
pub mod store;
pub mod system;

pub use canvas::{Canvas, ShapeRecorder};
pub use codec::{EntitySnapshot, RegistrySnapshot};
pub use error::EcsError;
pub use registry::EntityRegistry;
pub use store::ComponentStore;
pub use system::{System, SystemContext, SystemRegistry};
