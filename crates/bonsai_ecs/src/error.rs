//! Registry error types.

use bonsai_component::Entity;

/// Errors surfaced by the entity registry.
///
/// Absence (unknown entity, missing component) is not an error for ordinary
/// reads and writes; only codec failures and explicit lookups that cannot
/// proceed are reported here.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// Failed to encode a snapshot to MessagePack.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a snapshot from MessagePack.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The snapshot decoded but violates a registry invariant.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The entity does not exist.
    #[error("{0} not found")]
    EntityNotFound(Entity),
}
