//! # bonsai_app — headless driver
//!
//! Runs the simulation core at a fixed tick rate without a renderer.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (JSON file, then command-line overrides).
//! 2. Build the demo scene.
//! 3. Enter the fixed-timestep tick loop.
//! 4. When a tick limit is set, log a summary of the final state.

mod config;
mod demo;
mod tick;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bonsai_component::Position;
use bonsai_ecs::ShapeRecorder;
use config::{AppConfig, Overrides};
use tick::{Simulation, TickLoop};

#[derive(Parser)]
#[command(name = "bonsai_app", about = "Headless fixed-rate simulation driver")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run (0 = unlimited)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Target ticks per second
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Downward acceleration in units per second squared
    #[arg(short, long)]
    gravity: Option<f64>,
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bonsai_app=info".parse()?))
        .init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?.with_overrides(Overrides {
        ticks: args.ticks,
        tick_rate: args.tick_rate,
        gravity: args.gravity,
    })?;

    info!(
        tick_rate = config.tick.tick_rate,
        max_ticks = config.tick.max_ticks,
        gravity = config.physics.gravity,
        "simulation starting"
    );

    let mut simulation = Simulation::new(config.physics);
    let player = demo::populate(&mut simulation);

    let mut tick_loop = TickLoop::new(config.tick, simulation);
    tick_loop.run();

    let mut simulation = tick_loop.into_simulation();
    let registry = simulation.registry();
    if let Ok(Some(position)) = registry.fetch::<Position>(player) {
        let grounded = simulation
            .physics()
            .would_collide_at(registry, player, position.x, position.y + 1.0);
        let score = registry.get::<f64>(player, demo::SCORE)?.unwrap_or(0.0);
        info!(x = position.x, y = position.y, grounded, score, "player state");
    }
    let snapshot = registry.encode()?;
    let entities = registry.len();

    let mut canvas = ShapeRecorder::new();
    simulation.draw(&mut canvas);
    info!(
        ticks = simulation.tick_id(),
        entities,
        snapshot_bytes = snapshot.len(),
        outlines = canvas.shapes.len(),
        "simulation shut down"
    );
    Ok(())
}
