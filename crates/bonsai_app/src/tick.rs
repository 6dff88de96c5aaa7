//! The simulation tick and the fixed-rate driver loop.
//!
//! One tick is:
//!
//! 1. Gameplay systems, in registration order.
//! 2. Physics integration (parallel per entity, joined before returning).
//! 3. The collision pass, on the driver thread.
//! 4. Advance the tick counter.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use bonsai_collision::CollisionEngine;
use bonsai_ecs::{Canvas, EntityRegistry, System, SystemContext, SystemRegistry};
use bonsai_physics::{PhysicsConfig, PhysicsSystem};

use crate::config::TickConfig;

/// Owned simulation state: the registry plus everything that runs over it.
#[derive(Debug)]
pub struct Simulation {
    tick_id: u64,
    registry: EntityRegistry,
    systems: SystemRegistry,
    physics: PhysicsSystem,
    collisions: CollisionEngine,
}

impl Simulation {
    #[must_use]
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            tick_id: 0,
            registry: EntityRegistry::new(),
            systems: SystemRegistry::new(),
            physics: PhysicsSystem::new(physics),
            collisions: CollisionEngine::new(),
        }
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn systems_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }

    #[must_use]
    pub fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    pub fn collisions_mut(&mut self) -> &mut CollisionEngine {
        &mut self.collisions
    }

    /// Run every registered system's `init`.
    pub fn init(&mut self) {
        self.systems.init_all(&self.registry);
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let tick_id = self.tick_id + 1;
        debug!(tick_id, dt, systems = self.systems.len(), "tick start");

        let mut ctx = SystemContext::new(tick_id, dt, &self.registry);
        self.systems.update_all(&mut ctx, &[]);

        self.physics.step(&self.registry, dt);
        self.collisions.update(&self.registry);

        self.tick_id = tick_id;
        debug!(
            tick_id,
            entities = self.registry.len(),
            colliding = self.collisions.active_pairs().len(),
            "tick complete"
        );
    }

    /// Draw systems, then solid outlines, then collider outlines.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.systems.draw_all(&self.registry, canvas, &[]);
        self.physics.draw(&self.registry, canvas);
        self.collisions.draw_debug(&self.registry, canvas);
    }
}

/// Fixed-timestep driver over a [`Simulation`].
#[derive(Debug)]
pub struct TickLoop {
    config: TickConfig,
    simulation: Simulation,
}

impl TickLoop {
    /// Create a new tick loop with the given configuration.
    #[must_use]
    pub fn new(config: TickConfig, simulation: Simulation) -> Self {
        Self { config, simulation }
    }

    /// Stop driving and hand back the simulation.
    #[must_use]
    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }

    /// Run for the configured number of ticks, or indefinitely.
    ///
    /// Each tick advances by the fixed step `1 / tick_rate`, regardless of
    /// wall-clock time spent.
    pub fn run(&mut self) {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let dt = tick_duration.as_secs_f64();
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        self.simulation.init();

        loop {
            let start = Instant::now();

            self.simulation.tick(dt);

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.simulation.tick_id(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
