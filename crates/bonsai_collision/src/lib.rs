//! # bonsai_collision
//!
//! Pairwise overlap detection between collider-carrying entities, with
//! directional group-pair handlers and enter/stay/leave transition
//! tracking.
//!
//! - [`CollisionHandler`] — optional enter/stay/leave callbacks.
//! - [`CollisionEngine`] — handler table, per-tick detection pass, and
//!   debug outlines.
//! - [`shape`] — the collider overlap test.

pub mod engine;
pub mod handler;
pub mod shape;

pub use engine::{CollisionEngine, PairKey};
pub use handler::CollisionHandler;
