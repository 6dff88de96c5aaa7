//! Physics integration system.
//!
//! Each tick, every entity carrying `position` + `velocity` + `size` is
//! integrated as an independent task on rayon's pool:
//!
//! 1. `velocity.y += gravity * dt`.
//! 2. Candidate `new_x`, `new_y` from `position + velocity * dt`.
//! 3. For each solid obstacle (minus self and any excluded group), reject
//!    the horizontal move if the effective rectangle at `(new_x, y)`
//!    overlaps it, and independently reject the vertical move if the
//!    rectangle at `(x, new_y)` does. A rejected axis also zeroes that
//!    velocity component.
//! 4. Commit the new position and velocity.
//!
//! Blocking one axis never blocks the other, so bodies slide along
//! surfaces. Obstacle geometry is captured once at the start of the tick,
//! before any task runs, so every task resolves against the same obstacle
//! set regardless of scheduling.

use rayon::prelude::*;
use tracing::{debug, trace};

use bonsai_component::{Entity, Position, Size, Solid, SolidExclude, Velocity, names};
use bonsai_ecs::{Canvas, EntityRegistry, System, SystemContext};
use bonsai_math::{Rect, Rgba};

use crate::config::PhysicsConfig;

/// Outline colour for solid obstacles.
const SOLID_OUTLINE: Rgba = Rgba::new(0, 0, 255, 255);

/// A solid obstacle's effective rectangle, captured for one tick.
#[derive(Debug, Clone, Copy)]
struct Obstacle {
    entity: Entity,
    rect: Rect,
}

/// Gravity, integration, and static obstacle resolution.
#[derive(Debug, Clone, Default)]
pub struct PhysicsSystem {
    config: PhysicsConfig,
}

impl PhysicsSystem {
    /// Create a physics system.
    #[must_use]
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Register a static obstacle rectangle, e.g. one collidable region of
    /// a tile map.
    pub fn add_obstacle(registry: &EntityRegistry, x: f64, y: f64, width: f64, height: f64) -> Entity {
        let entity = registry.create_entity();
        registry.insert(entity, Position::new(x, y));
        registry.insert(entity, Size::new(width, height));
        registry.insert(entity, Solid);
        debug!(%entity, x, y, width, height, "added obstacle");
        entity
    }

    /// Advance every moving entity by `dt` seconds.
    ///
    /// Returns once every per-entity task has completed.
    pub fn step(&self, registry: &EntityRegistry, dt: f64) {
        let movers = registry.query(&[names::POSITION, names::VELOCITY, names::SIZE]);
        let obstacles = collect_obstacles(registry);

        movers
            .par_iter()
            .for_each(|&entity| self.integrate(registry, entity, dt, &obstacles));

        trace!(
            movers = movers.len(),
            obstacles = obstacles.len(),
            dt,
            "physics step complete"
        );
    }

    /// Would moving `entity` to `x` (keeping its y) or to `y` (keeping its
    /// x) overlap a solid obstacle?
    ///
    /// Does not mutate anything. Returns `false` if the entity lacks
    /// `position` or `size`.
    #[must_use]
    pub fn would_collide_at(&self, registry: &EntityRegistry, entity: Entity, x: f64, y: f64) -> bool {
        let (Ok(Some(position)), Ok(Some(size))) =
            (registry.fetch::<Position>(entity), registry.fetch::<Size>(entity))
        else {
            return false;
        };
        let obstacles = collect_obstacles(registry);
        let horizontal = size.effective_rect(x, position.y);
        let vertical = size.effective_rect(position.x, y);
        blockers(registry, entity, &obstacles)
            .any(|o| horizontal.overlaps(&o.rect) || vertical.overlaps(&o.rect))
    }

    fn integrate(&self, registry: &EntityRegistry, entity: Entity, dt: f64, obstacles: &[Obstacle]) {
        let (Ok(Some(position)), Ok(Some(mut velocity)), Ok(Some(size))) = (
            registry.fetch::<Position>(entity),
            registry.fetch::<Velocity>(entity),
            registry.fetch::<Size>(entity),
        ) else {
            trace!(%entity, "skipping entity without readable motion components");
            return;
        };

        velocity.y += self.config.gravity * dt;

        let mut new_x = position.x + velocity.x * dt;
        let mut new_y = position.y + velocity.y * dt;

        for obstacle in blockers(registry, entity, obstacles) {
            if size.effective_rect(new_x, position.y).overlaps(&obstacle.rect) {
                new_x = position.x;
                velocity.x = 0.0;
            }
            if size.effective_rect(position.x, new_y).overlaps(&obstacle.rect) {
                new_y = position.y;
                velocity.y = 0.0;
            }
        }

        registry.insert(entity, velocity);
        registry.insert(entity, Position::new(new_x, new_y));
    }
}

impl System for PhysicsSystem {
    fn update(&mut self, ctx: &mut SystemContext<'_>) {
        self.step(ctx.registry, ctx.dt);
    }

    /// Outline every solid obstacle's effective rectangle.
    fn draw(&mut self, registry: &EntityRegistry, canvas: &mut dyn Canvas) {
        for obstacle in collect_obstacles(registry) {
            canvas.stroke_rect(obstacle.rect, SOLID_OUTLINE);
        }
    }
}

/// Every solid with a readable position and size.
fn collect_obstacles(registry: &EntityRegistry) -> Vec<Obstacle> {
    registry
        .query(&[names::POSITION, names::SIZE, names::SOLID])
        .into_iter()
        .filter_map(|entity| {
            let position = registry.fetch::<Position>(entity).ok().flatten()?;
            let size = registry.fetch::<Size>(entity).ok().flatten()?;
            Some(Obstacle {
                entity,
                rect: size.effective_rect(position.x, position.y),
            })
        })
        .collect()
}

/// Obstacles that can block `entity`: everything except itself and, if it
/// carries `solidexclude = G`, any obstacle that has a component named `G`.
fn blockers<'a>(
    registry: &'a EntityRegistry,
    entity: Entity,
    obstacles: &'a [Obstacle],
) -> impl Iterator<Item = &'a Obstacle> + 'a {
    let excluded = registry
        .fetch::<SolidExclude>(entity)
        .ok()
        .flatten()
        .filter(|g| !g.group().is_empty());
    obstacles.iter().filter(move |o| {
        o.entity != entity
            && !excluded
                .as_ref()
                .is_some_and(|g| registry.has_component(o.entity, g.group()))
    })
}
