//! # bonsai_physics
//!
//! The physics system: gravity, velocity integration, and axis-separated
//! resolution against static `solid` obstacles.
//!
//! - [`PhysicsConfig`] — gravity constant.
//! - [`PhysicsSystem`] — per-tick parallel integration, the
//!   [`PhysicsSystem::would_collide_at`] probe, and obstacle registration.

pub mod config;
pub mod system;

pub use config::PhysicsConfig;
pub use system::PhysicsSystem;
