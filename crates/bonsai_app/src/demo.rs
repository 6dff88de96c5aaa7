//! A small platformer scene used when the driver runs standalone.
//!
//! A walking player falls through a one-way `cloud` plank onto the floor
//! and picks up a coin on the way.

use tracing::{debug, info};

use bonsai_collision::CollisionHandler;
use bonsai_component::{Collider, Entity, Marker, Position, Size, SolidExclude, Velocity, names};
use bonsai_ecs::{EntityRegistry, System, SystemContext};
use bonsai_physics::PhysicsSystem;

use crate::tick::Simulation;

/// Ident of the demo player entity.
pub const PLAYER: &str = "player";
/// Number component holding collected coins.
pub const SCORE: &str = "score";
/// Group component ignored by the player's physics.
const CLOUD: &str = "cloud";

/// Walks one entity horizontally, turning around when blocked.
#[derive(Debug)]
pub struct Walker {
    entity: Entity,
    speed: f64,
    direction: f64,
}

impl Walker {
    #[must_use]
    pub fn new(entity: Entity, speed: f64) -> Self {
        Self {
            entity,
            speed,
            direction: 1.0,
        }
    }
}

impl System for Walker {
    fn init(&mut self, registry: &EntityRegistry) {
        let mut velocity = registry
            .fetch::<Velocity>(self.entity)
            .ok()
            .flatten()
            .unwrap_or(Velocity::ZERO);
        velocity.x = self.speed * self.direction;
        registry.insert(self.entity, velocity);
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) {
        let Ok(Some(mut velocity)) = ctx.registry.fetch::<Velocity>(self.entity) else {
            return;
        };
        // Physics zeroes vx when the last horizontal move was rejected.
        if velocity.x == 0.0 {
            self.direction = -self.direction;
            debug!(entity = %self.entity, tick_id = ctx.tick_id, "walker turned around");
        }
        velocity.x = self.speed * self.direction;
        ctx.registry.insert(self.entity, velocity);
    }
}

/// Populate `sim` with the demo scene and return the player entity.
pub fn populate(sim: &mut Simulation) -> Entity {
    let registry = sim.registry();

    let player = registry.create_entity_with_ident(PLAYER);
    registry.insert(player, Position::new(32.0, 100.0));
    registry.insert(player, Size::new(16.0, 16.0));
    registry.insert(player, Collider::rect("player", 16.0, 16.0));
    registry.insert(player, SolidExclude::new(CLOUD));
    registry.set_component(player, SCORE, 0.0_f64);
    registry.mark_persistent(player);

    // Floor and right-hand wall.
    PhysicsSystem::add_obstacle(registry, 0.0, 200.0, 640.0, 16.0);
    PhysicsSystem::add_obstacle(registry, 400.0, 100.0, 16.0, 100.0);

    let plank = PhysicsSystem::add_obstacle(registry, 0.0, 150.0, 200.0, 8.0);
    registry.set_component(plank, CLOUD, Marker);

    let coin = registry.create_entity();
    registry.insert(coin, Position::new(96.0, 188.0));
    registry.insert(coin, Size::new(8.0, 8.0));
    registry.insert(coin, Collider::rect("coin", 8.0, 8.0));

    sim.collisions_mut().add_handler(
        "player",
        "coin",
        CollisionHandler::new().on_enter(|registry, player, coin| {
            registry.remove_entity(coin);
            let score = registry.get::<f64>(player, SCORE).ok().flatten().unwrap_or(0.0);
            registry.set_component(player, SCORE, score + 1.0);
            info!(%player, %coin, score = score + 1.0, "coin collected");
        }),
    );

    sim.systems_mut().add("walker", Walker::new(player, 60.0));

    debug!(
        entities = sim.registry().len(),
        solids = sim.registry().query(&[names::SOLID]).len(),
        "demo scene ready"
    );
    player
}

#[cfg(test)]
mod tests {
    use bonsai_physics::PhysicsConfig;

    use super::*;

    #[test]
    fn test_demo_player_lands_and_collects_coin() {
        let mut sim = Simulation::new(PhysicsConfig::default());
        let player = populate(&mut sim);
        sim.init();
        for _ in 0..180 {
            sim.tick(1.0 / 60.0);
        }

        let registry = sim.registry();
        let p = registry.fetch::<Position>(player).unwrap().unwrap();
        // Fell through the cloud plank, resting on the floor.
        assert!(p.y > 170.0 && p.y + 16.0 <= 200.0);
        assert_eq!(registry.fetch::<Velocity>(player).unwrap().unwrap().y, 0.0);
        assert!(sim.physics().would_collide_at(registry, player, p.x, p.y + 1.0));

        assert_eq!(registry.get::<f64>(player, SCORE).unwrap(), Some(1.0));
        assert_eq!(registry.query(&[names::COLLIDER]), vec![player]);
    }

    #[test]
    fn test_walker_turns_around_at_wall() {
        let mut sim = Simulation::new(PhysicsConfig::new(0.0));
        let registry = sim.registry();
        let e = registry.create_entity();
        registry.insert(e, Position::new(0.0, 0.0));
        registry.insert(e, Size::new(10.0, 10.0));
        PhysicsSystem::add_obstacle(registry, 20.0, 0.0, 10.0, 10.0);
        sim.systems_mut().add("walker", Walker::new(e, 100.0));
        sim.init();

        // x = 10, then blocked at 10, then walking back to 0.
        sim.tick(0.1);
        sim.tick(0.1);
        assert_eq!(sim.registry().fetch::<Position>(e).unwrap().unwrap().x, 10.0);
        sim.tick(0.1);

        let registry = sim.registry();
        assert_eq!(registry.fetch::<Position>(e).unwrap().unwrap().x, 0.0);
        assert_eq!(registry.fetch::<Velocity>(e).unwrap().unwrap().x, -100.0);
    }

    #[test]
    fn test_player_survives_level_switch() {
        let mut sim = Simulation::new(PhysicsConfig::default());
        let player = populate(&mut sim);
        let removed = sim.registry().remove_transient();
        assert!(removed > 0);
        assert_eq!(sim.registry().entities(), vec![player]);
        assert_eq!(sim.registry().entity_by_ident(PLAYER), Some(player));
    }
}
