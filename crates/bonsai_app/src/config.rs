//! Driver configuration.
//!
//! Loaded from an optional JSON file; every field falls back to its
//! default, and command-line flags override whatever the file says.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use bonsai_physics::PhysicsConfig;

/// Configuration for the fixed-rate tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

/// Everything the driver needs to build and run a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick: TickConfig,
    pub physics: PhysicsConfig,
}

/// Values given on the command line. `None` leaves the configured value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub ticks: Option<u64>,
    pub tick_rate: Option<f64>,
    pub gravity: Option<f64>,
}

impl AppConfig {
    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(ticks) = overrides.ticks {
            self.tick.max_ticks = ticks;
        }
        if let Some(rate) = overrides.tick_rate {
            self.tick.tick_rate = rate;
        }
        if let Some(gravity) = overrides.gravity {
            self.physics.gravity = gravity;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !(self.tick.tick_rate.is_finite() && self.tick.tick_rate > 0.0) {
            bail!("tick_rate must be a positive number, got {}", self.tick.tick_rate);
        }
        if !self.physics.gravity.is_finite() {
            bail!("gravity must be finite, got {}", self.physics.gravity);
        }
        Ok(())
    }
}
