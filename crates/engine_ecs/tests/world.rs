//! End-to-end behaviour of composed worlds: entity lifecycle, queries,
//! registration semantics and intra-tick visibility.

use std::cell::RefCell;
use std::rc::Rc;

use engine_ecs::{
    ComponentSchema, ComposeError, Composer, Entity, Module, StateKind, StoreError, World,
    WorldError,
};

struct Spatial;
impl Module for Spatial {
    const NAME: &'static str = "spatial";
    type State = ();
    fn components(schema: &mut ComponentSchema) {
        schema.field::<[f32; 3]>("location");
    }
}

struct Stats;
impl Module for Stats {
    const NAME: &'static str = "stats";
    type State = ();
    fn components(schema: &mut ComponentSchema) {
        schema
            .field::<i64>("c1")
            .field::<i64>("c2")
            .field::<u8>("level")
            .field::<f64>("ratio");
    }
}

struct Settings;
pub struct SettingsGlobals {
    pub step: i64,
    pub label: &'static str,
}
impl Module for Settings {
    const NAME: &'static str = "settings";
    type State = SettingsGlobals;
    const STATE: StateKind = StateKind::Globals;
}

struct Collider;
impl Module for Collider {
    const NAME: &'static str = "collider";
    type State = ();
    fn components(schema: &mut ComponentSchema) {
        schema.field::<f32>("location");
    }
}

fn make_world() -> World {
    let composition = Composer::new()
        .with::<Spatial>()
        .with::<Stats>()
        .with::<Settings>()
        .compose()
        .unwrap();
    World::from_composition(composition)
}

fn collect(world: &World, names: &[&str]) -> Vec<Entity> {
    world.store().query(names).unwrap().into_iter().collect()
}

#[test]
fn test_empty_query_tracks_entity_lifetime() {
    let mut world = make_world();
    let a = world.store_mut().create_entity().unwrap();
    let b = world.store_mut().create_entity().unwrap();
    assert_eq!(collect(&world, &[]), vec![a, b]);

    world.store_mut().remove_entity(a).unwrap();
    assert_eq!(collect(&world, &[]), vec![b]);
    assert!(collect(&world, &["c1"]).is_empty());
}

#[test]
fn test_removed_entity_absent_from_every_query() {
    let mut world = make_world();
    let store = world.store_mut();
    let e = store.create_entity().unwrap();
    store.set_component(e, "c1", 1i64).unwrap();
    store.set_component(e, "c2", 2i64).unwrap();
    store.set_component(e, "location", [0.0f32; 3]).unwrap();
    store.remove_entity(e).unwrap();

    let cases: [&[&str]; 5] = [&[], &["c1"], &["c2"], &["c1", "c2"], &["location"]];
    for names in cases {
        assert!(collect(&world, names).is_empty(), "query {names:?}");
    }
}

#[test]
fn test_get_returns_latest_write() {
    let mut world = make_world();
    let store = world.store_mut();
    let e = store.create_entity().unwrap();
    assert_eq!(store.get_component::<i64>(e, "c1").unwrap(), None);
    store.set_component(e, "c1", 1i64).unwrap();
    store.set_component(e, "c1", 2i64).unwrap();
    assert_eq!(store.get_component::<i64>(e, "c1").unwrap(), Some(&2));
    store.remove_component(e, "c1").unwrap();
    assert_eq!(store.get_component::<i64>(e, "c1").unwrap(), None);
}

#[test]
fn test_query_partial_overlap_fixture() {
    let mut world = make_world();
    let store = world.store_mut();
    let a = store.create_entity().unwrap();
    let b = store.create_entity().unwrap();
    let c = store.create_entity().unwrap();
    store.set_component(a, "c1", 0i64).unwrap();
    store.set_component(b, "c1", 0i64).unwrap();
    store.set_component(b, "c2", 0i64).unwrap();
    store.set_component(c, "c2", 0i64).unwrap();

    assert_eq!(collect(&world, &["c1", "c2"]), vec![b]);
    assert_eq!(collect(&world, &["c2", "c1"]), vec![b]);
    assert_eq!(collect(&world, &["c1"]), vec![a, b]);
    assert_eq!(collect(&world, &["c2"]), vec![b, c]);
}

#[test]
fn test_disjoint_modules_compose() {
    let composition = Composer::new()
        .with::<Spatial>()
        .with::<Stats>()
        .compose()
        .unwrap();
    let names: Vec<&str> = composition.fields().iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["location", "c1", "c2", "level", "ratio"]);
    assert!(composition.field("location").unwrap().accepts::<[f32; 3]>());
    assert!(composition.field("ratio").unwrap().accepts::<f64>());
}

#[test]
fn test_colliding_modules_fail_to_compose() {
    let err = Composer::new()
        .with::<Spatial>()
        .with::<Collider>()
        .compose()
        .unwrap_err();
    assert!(matches!(
        err,
        ComposeError::DuplicateComponent {
            name: "location",
            ..
        }
    ));
}

#[test]
fn test_last_registration_wins() {
    let mut world = make_world();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&calls);
    world.register("sys", move |_| {
        log.borrow_mut().push("f1");
        Ok(())
    });
    let log = Rc::clone(&calls);
    world.register("sys", move |_| {
        log.borrow_mut().push("f2");
        Ok(())
    });

    assert_eq!(world.systems().len(), 1);
    world.tick().unwrap();
    world.tick().unwrap();
    assert_eq!(*calls.borrow(), vec!["f2", "f2"]);
}

#[test]
fn test_writes_visible_to_later_systems_in_same_tick() {
    let mut world = make_world();
    let e = world.store_mut().create_entity().unwrap();
    let observed = Rc::new(RefCell::new(Vec::new()));

    world.register("A", move |adapter| {
        let next = adapter.get::<i64>(e, "c1")?.copied().unwrap_or(0) + 1;
        adapter.set(e, "c1", next)?;
        Ok(())
    });
    let seen = Rc::clone(&observed);
    world.register("B", move |adapter| {
        seen.borrow_mut().push(adapter.get::<i64>(e, "c1")?.copied());
        Ok(())
    });
    world.register("C", |_| Ok(()));

    world.tick().unwrap();
    world.tick().unwrap();
    assert_eq!(*observed.borrow(), vec![Some(1), Some(2)]);
}

#[test]
fn test_unregister_unknown_is_noop() {
    let mut world = make_world();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    world.register("counter", move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    world.unregister("missing");
    world.tick().unwrap();
    assert_eq!(*count.borrow(), 1);
    assert_eq!(world.systems().names().collect::<Vec<_>>(), vec!["counter"]);
}

#[test]
fn test_unregistered_system_never_runs_again() {
    let mut world = make_world();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    world.register("counter", move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });
    world.tick().unwrap();
    world.unregister("counter");
    world.tick().unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_boundary_value_roundtrips() {
    let mut world = make_world();
    let store = world.store_mut();
    let e = store.create_entity().unwrap();

    for v in [0i64, i64::MAX, i64::MIN, -1] {
        store.set_component(e, "c1", v).unwrap();
        assert_eq!(store.get_component::<i64>(e, "c1").unwrap(), Some(&v));
    }
    for v in [0u8, u8::MAX] {
        store.set_component(e, "level", v).unwrap();
        assert_eq!(store.get_component::<u8>(e, "level").unwrap(), Some(&v));
    }
    for v in [0.0f64, -0.0, f64::MAX, f64::MIN, f64::MIN_POSITIVE] {
        store.set_component(e, "ratio", v).unwrap();
        let got = *store.get_component::<f64>(e, "ratio").unwrap().unwrap();
        assert_eq!(got.to_bits(), v.to_bits());
    }
}

#[test]
fn test_globals_read_through_adapter() {
    let mut world = make_world();
    world
        .set_state::<Settings>(SettingsGlobals {
            step: 5,
            label: "fixed",
        })
        .unwrap();
    let e = world.store_mut().create_entity().unwrap();
    world.store_mut().set_component(e, "c1", 0i64).unwrap();

    world.register("step", |adapter| {
        let step = adapter.state::<Settings>()?.step;
        let hits: Vec<Entity> = adapter.query(&["c1"])?.into_iter().collect();
        for entity in hits {
            if let Some(value) = adapter.get_mut::<i64>(entity, "c1")? {
                *value += step;
            }
        }
        Ok(())
    });

    world.tick().unwrap();
    world.tick().unwrap();
    assert_eq!(world.store().get_component::<i64>(e, "c1").unwrap(), Some(&10));
    assert_eq!(world.state::<Settings>().unwrap().label, "fixed");
}

#[test]
fn test_worlds_are_isolated() {
    let mut first = make_world();
    let second = make_world();
    first.store_mut().create_entity().unwrap();
    first
        .set_state::<Settings>(SettingsGlobals {
            step: 1,
            label: "first",
        })
        .unwrap();
    assert_eq!(second.store().entity_count(), 0);
    assert!(second.state::<Settings>().is_err());
}

#[test]
fn test_invalid_entity_inside_system_is_reported() {
    let mut world = make_world();
    let e = world.store_mut().create_entity().unwrap();
    world.store_mut().remove_entity(e).unwrap();
    world.register("stale", move |adapter| {
        adapter.set(e, "c1", 1i64)?;
        Ok(())
    });

    match world.tick() {
        Err(WorldError::System { name, source, .. }) => {
            assert_eq!(name, "stale");
            assert_eq!(
                source.downcast_ref::<StoreError>(),
                Some(&StoreError::NoSuchEntity(e))
            );
        }
        Ok(()) => panic!("tick should fail on a removed entity"),
    }
}
