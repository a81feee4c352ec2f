//! # engine_app
//!
//! Small ballistic simulation on top of `engine_ecs`.
//!
//! ## Startup Sequence
//!
//! 1. Parse flags and load the optional JSON config.
//! 2. Compose the `transform`, `motion` and `clock` modules into a world.
//! 3. Spawn the initial bodies and register the systems.
//! 4. Enter the fixed-timestep tick loop.

mod config;
mod modules;
mod systems;
mod tick;

use anyhow::Result;
use clap::Parser;
use engine_ecs::{Composer, World};
use engine_math::{Transform3D, TransformModule, Vec3};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, Cli};
use modules::{Clock, ClockState, Motion, MotionGlobals, VELOCITY};
use tick::TickLoop;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;
    info!(?config, "engine_app starting");

    let composition = Composer::new()
        .with::<TransformModule>()
        .with::<Motion>()
        .with::<Clock>()
        .compose()?;

    let mut world = World::new(composition, config.world.clone());
    world.set_state::<Motion>(MotionGlobals::default())?;
    world.set_state::<Clock>(ClockState::default())?;

    spawn_bodies(&mut world, config.spawn)?;

    world.register("gravity", systems::apply_gravity);
    world.register("integrate", systems::integrate);
    world.register("cull", systems::cull);
    world.register("report", systems::report);

    let mut tick_loop = TickLoop::new(config.tick, world);
    tick_loop.run()?;

    info!(
        entities = tick_loop.world().store().entity_count(),
        "engine_app shut down"
    );
    Ok(())
}

/// Spawn `count` bodies on a ring, each thrown outward and upward.
fn spawn_bodies(world: &mut World, count: usize) -> Result<()> {
    let store = world.store_mut();
    for i in 0..count {
        let angle = i as f32 / count.max(1) as f32 * std::f32::consts::TAU;
        let dir = Vec3::new(angle.cos(), 0.0, angle.sin());

        let entity = store.create_entity()?;
        Transform3D::from_position(dir * 2.0).insert(store, entity)?;
        store.set_component(entity, VELOCITY, dir * 3.0 + Vec3::Y * (5.0 + i as f32 % 4.0))?;
    }
    info!(count, "spawned bodies");
    Ok(())
}
