//! Demo systems, registered in this order: gravity, integrate, cull, report.

use engine_ecs::{Adapter, Entity, QueryDescriptor, SystemResult};
use engine_math::{LOCATION, Vec3};
use tracing::info;

use crate::modules::{Clock, Motion, VELOCITY};

/// Ticks between two `report` log lines.
pub const REPORT_EVERY: u64 = 60;

/// Accelerate every body with a velocity by the global gravity.
pub fn apply_gravity(adapter: &mut Adapter<'_>) -> SystemResult {
    let dt = adapter.state::<Clock>()?.dt;
    let gravity = adapter.state::<Motion>()?.gravity;

    let bodies: Vec<Entity> = adapter.query(&[VELOCITY])?.into_iter().collect();
    for entity in bodies {
        if let Some(velocity) = adapter.get_mut::<Vec3>(entity, VELOCITY)? {
            *velocity += gravity * dt;
        }
    }
    Ok(())
}

/// Move every body along its velocity.
pub fn integrate(adapter: &mut Adapter<'_>) -> SystemResult {
    let dt = adapter.state::<Clock>()?.dt;

    let bodies: Vec<Entity> = adapter.query(&[LOCATION, VELOCITY])?.into_iter().collect();
    for entity in bodies {
        let Some(&velocity) = adapter.get::<Vec3>(entity, VELOCITY)? else {
            continue;
        };
        if let Some(location) = adapter.get_mut::<Vec3>(entity, LOCATION)? {
            *location += velocity * dt;
        }
    }
    Ok(())
}

/// Remove bodies that fell below the kill plane.
pub fn cull(adapter: &mut Adapter<'_>) -> SystemResult {
    let kill_plane = adapter.state::<Motion>()?.kill_plane;

    let mut doomed = Vec::new();
    for entity in &adapter.query_with(&QueryDescriptor::new().with(LOCATION))? {
        if let Some(location) = adapter.get::<Vec3>(entity, LOCATION)?
            && location.y < kill_plane
        {
            doomed.push(entity);
        }
    }
    for entity in doomed {
        adapter.remove_entity(entity)?;
    }
    Ok(())
}

/// Log a summary every [`REPORT_EVERY`] ticks.
pub fn report(adapter: &mut Adapter<'_>) -> SystemResult {
    if adapter.tick() % REPORT_EVERY != 0 {
        return Ok(());
    }
    let elapsed = adapter.state::<Clock>()?.elapsed;
    let moving = adapter.query(&[VELOCITY])?.iter().count();
    info!(
        tick = adapter.tick(),
        elapsed_s = elapsed,
        entities = adapter.store().entity_count(),
        moving,
        "simulation report"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine_ecs::{Composer, StateError, World, WorldError};
    use engine_math::TransformModule;

    use super::*;
    use crate::modules::{ClockState, MotionGlobals};

    fn make_world() -> World {
        let composition = Composer::new()
            .with::<TransformModule>()
            .with::<Motion>()
            .with::<Clock>()
            .compose()
            .unwrap();
        let mut world = World::from_composition(composition);
        world
            .set_state::<Motion>(MotionGlobals {
                gravity: Vec3::new(0.0, -10.0, 0.0),
                kill_plane: -5.0,
            })
            .unwrap();
        world
            .set_state::<Clock>(ClockState {
                dt: 0.5,
                elapsed: 0.5,
            })
            .unwrap();
        world
    }

    fn spawn(world: &mut World, location: Vec3, velocity: Option<Vec3>) -> Entity {
        let store = world.store_mut();
        let e = store.create_entity().unwrap();
        store.set_component(e, LOCATION, location).unwrap();
        if let Some(v) = velocity {
            store.set_component(e, VELOCITY, v).unwrap();
        }
        e
    }

    fn location(world: &World, e: Entity) -> Vec3 {
        *world.store().get_component::<Vec3>(e, LOCATION).unwrap().unwrap()
    }

    #[test]
    fn test_gravity_then_integrate_in_one_tick() {
        let mut world = make_world();
        let mover = spawn(&mut world, Vec3::ZERO, Some(Vec3::ZERO));
        let fixed = spawn(&mut world, Vec3::ONE, None);
        world.register("gravity", apply_gravity);
        world.register("integrate", integrate);

        world.tick().unwrap();
        // velocity becomes -5 by gravity, then integrate sees it immediately.
        assert_eq!(location(&world, mover), Vec3::new(0.0, -2.5, 0.0));
        assert_eq!(location(&world, fixed), Vec3::ONE);
    }

    #[test]
    fn test_cull_removes_fallen_bodies() {
        let mut world = make_world();
        let high = spawn(&mut world, Vec3::ZERO, None);
        let low = spawn(&mut world, Vec3::new(0.0, -6.0, 0.0), None);
        world.register("cull", cull);

        world.tick().unwrap();
        assert!(world.store().contains(high));
        assert!(!world.store().contains(low));
    }

    #[test]
    fn test_missing_clock_fails_gravity() {
        let composition = Composer::new()
            .with::<TransformModule>()
            .with::<Motion>()
            .with::<Clock>()
            .compose()
            .unwrap();
        let mut world = World::from_composition(composition);
        world.register("gravity", apply_gravity);
        assert!(world.tick().is_err());
    }

    #[test]
    fn test_report_reads_clock_only_on_schedule() {
        let composition = Composer::new()
            .with::<TransformModule>()
            .with::<Motion>()
            .with::<Clock>()
            .compose()
            .unwrap();
        let mut world = World::from_composition(composition);
        world.register("report", report);

        // Without a clock installed, only the reporting tick can fail.
        for _ in 1..REPORT_EVERY {
            world.tick().unwrap();
        }
        let WorldError::System { name, tick, source } = world.tick().unwrap_err();
        assert_eq!(name, "report");
        assert_eq!(tick, REPORT_EVERY);
        assert_eq!(
            source.downcast_ref::<StateError>(),
            Some(&StateError::Uninitialized("clock"))
        );

        world.set_state::<Clock>(ClockState::default()).unwrap();
        for _ in 0..REPORT_EVERY {
            world.tick().unwrap();
        }
        assert_eq!(world.tick_count(), 2 * REPORT_EVERY);
    }
}
