//! Physics configuration.

use serde::{Deserialize, Serialize};

/// Default downward acceleration in world units per second squared.
pub const DEFAULT_GRAVITY: f64 = 200.0;

/// Configuration for the physics system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to every moving entity's vertical velocity, per second.
    pub gravity: f64,
}

impl PhysicsConfig {
    /// Create a config with the given gravity.
    #[must_use]
    pub fn new(gravity: f64) -> Self {
        Self { gravity }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gravity() {
        assert_eq!(PhysicsConfig::default().gravity, 200.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PhysicsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PhysicsConfig::default());
        let config: PhysicsConfig = serde_json::from_str(r#"{"gravity": 9.8}"#).unwrap();
        assert_eq!(config.gravity, 9.8);
    }
}
