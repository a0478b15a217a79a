//! Cross-module behaviour of the world, scheduler and filters

use ecl_core::ecs::{EntityRegistry, LogicState};
use ecl_core::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<&'static str>>>;

#[derive(Default)]
struct A;
impl Part for A {}

#[derive(Default)]
struct B;
impl Part for B {}

#[derive(Default)]
struct C;
impl Part for C {}

/// Appends its label to a shared log on every run
#[derive(Default)]
struct Recorder {
    label: &'static str,
    priority: i8,
    log: Log,
}

impl Part for Recorder {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Recorder {
    fn priority(&self) -> i8 {
        self.priority
    }

    fn run(&mut self, _ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        self.log.borrow_mut().push(self.label);
        Ok(())
    }
}

/// Spawns a recorder on a new entity the first time it runs
#[derive(Default)]
struct Spawner {
    log: Log,
    spawned: bool,
}

impl Part for Spawner {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Spawner {
    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        self.log.borrow_mut().push("spawner");
        if !self.spawned {
            self.spawned = true;
            let world = ctx.world_mut();
            let child = world.spawn(Spawn::empty("child"))?;
            world.get_or_insert(
                child,
                Recorder {
                    label: "child",
                    priority: -3,
                    log: self.log.clone(),
                },
            )?;
        }
        Ok(())
    }
}

/// Destroys a target entity when it runs
struct Assassin {
    target: Entity,
}

impl Part for Assassin {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Assassin {
    fn priority(&self) -> i8 {
        -3
    }

    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        if ctx.world().is_alive(self.target) {
            ctx.world_mut().destroy(self.target)?;
        }
        Ok(())
    }
}

fn recorder(world: &mut World, log: &Log, label: &'static str, priority: i8) -> Entity {
    let entity = world.spawn(Spawn::empty(label)).unwrap();
    world
        .get_or_insert(
            entity,
            Recorder {
                label,
                priority,
                log: log.clone(),
            },
        )
        .unwrap();
    entity
}

#[test]
fn registry_reports_registered_minus_unregistered() {
    let mut world = World::new(Scene::new());
    let entities: Vec<Entity> = (0..6)
        .map(|_| world.spawn(Spawn::default()).unwrap())
        .collect();

    world.destroy(entities[0]).unwrap();
    world.destroy(entities[4]).unwrap();

    assert_eq!(
        world.entities(),
        &[entities[1], entities[2], entities[3], entities[5]]
    );

    let mut registry = EntityRegistry::new();
    for entity in &entities {
        registry.register(*entity);
    }
    registry.unregister(entities[2]).unwrap();
    assert_eq!(registry.len(), 5);
    assert!(registry.unregister(entities[2]).is_err());
}

#[test]
fn get_or_add_returns_the_same_instance() {
    let mut world = World::new(Scene::new());
    let entity = world.spawn(Spawn::default()).unwrap();

    let first: *const A = world.get_or_add::<A>(entity).unwrap();
    let second: *const A = world.get_or_add::<A>(entity).unwrap();

    assert_eq!(first, second);
}

#[test]
fn promotion_sorts_by_priority_keeping_creation_order() {
    let log: Log = Rc::default();
    let mut world = World::new(Scene::new());
    recorder(&mut world, &log, "two", 2);
    recorder(&mut world, &log, "minus-one-first", -1);
    recorder(&mut world, &log, "zero", 0);
    recorder(&mut world, &log, "minus-one-second", -1);

    world.tick();

    let priorities: Vec<i8> = world.scheduler().scheduled().map(|e| e.priority).collect();
    assert_eq!(priorities, vec![-1, -1, 0, 2]);
    assert_eq!(
        *log.borrow(),
        vec!["minus-one-first", "minus-one-second", "zero", "two"]
    );
}

#[test]
fn logic_created_during_a_tick_runs_on_the_next_one() {
    let log: Log = Rc::default();
    let mut world = World::new(Scene::new());
    let entity = world.spawn(Spawn::default()).unwrap();
    world
        .get_or_insert(
            entity,
            Spawner {
                log: log.clone(),
                spawned: false,
            },
        )
        .unwrap();

    world.tick();
    assert_eq!(*log.borrow(), vec!["spawner"]);
    let child = world.find_first_with_part::<Recorder>().unwrap();
    assert_eq!(
        world.logic_state::<Recorder>(child).unwrap(),
        Some(LogicState::Pending)
    );

    log.borrow_mut().clear();
    world.tick();
    assert_eq!(*log.borrow(), vec!["child", "spawner"]);
}

#[test]
fn make_intersects_part_sets() {
    let mut world = World::new(Scene::new());
    let e1 = world.spawn(Spawn::default()).unwrap();
    let e2 = world.spawn(Spawn::default()).unwrap();
    let e3 = world.spawn(Spawn::default()).unwrap();
    world.get_or_add::<A>(e1).unwrap();
    world.get_or_add::<B>(e1).unwrap();
    world.get_or_add::<A>(e2).unwrap();
    world.get_or_add::<A>(e3).unwrap();
    world.get_or_add::<B>(e3).unwrap();
    world.get_or_add::<C>(e3).unwrap();

    let filter = Filter::make::<(A, B)>(&world);

    assert_eq!(filter.as_slice(), &[e1, e3]);
}

#[test]
fn queries_leave_sources_untouched() {
    let mut world = World::new(Scene::new());
    for i in 0..5 {
        let entity = world.spawn(Spawn::default()).unwrap();
        world.get_or_add::<A>(entity).unwrap();
        if i % 2 == 0 {
            world.get_or_add::<B>(entity).unwrap();
        }
    }
    let entities = world.entities().to_vec();
    let source = world.filter::<(A,)>();

    let first = source.exclude::<B>(&world);
    let second = source.exclude::<B>(&world);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(source.len(), 5);
    assert_eq!(world.filter::<(A,)>(), source);
    assert_eq!(world.entities(), entities.as_slice());
    assert!(source.is_current(&world));

    world.tick();
    let again = world.filter::<(A,)>();
    assert_eq!(again, source);
    assert_eq!(again.exclude::<B>(&world), first);
    assert!(source.is_current(&world));
}

#[test]
fn destroyed_entity_logics_never_run_again() {
    let log: Log = Rc::default();
    let mut world = World::new(Scene::new());
    let scheduled = recorder(&mut world, &log, "scheduled", 0);
    world.tick();
    let pending = recorder(&mut world, &log, "pending", 0);

    world.destroy(scheduled).unwrap();
    world.destroy(pending).unwrap();
    log.borrow_mut().clear();
    let report = world.tick();

    assert!(log.borrow().is_empty());
    assert_eq!(report.ran, 0);
    assert!(world.scheduler().is_empty());
    assert_eq!(world.find_first_with_part::<Recorder>(), None);
}

#[test]
fn entity_destroyed_mid_tick_is_skipped() {
    let log: Log = Rc::default();
    let mut world = World::new(Scene::new());
    let victim = recorder(&mut world, &log, "victim", 2);
    let killer = world.spawn(Spawn::default()).unwrap();
    world
        .get_or_insert(killer, Assassin { target: victim })
        .unwrap();

    let report = world.tick();

    assert!(report.is_clean());
    assert!(log.borrow().is_empty());
    assert!(!world.is_alive(victim));
    assert_eq!(world.entities(), &[killer]);
}

#[test]
fn spawn_then_find_returns_the_new_entity() {
    const ENEMY: Tag = Tag(1);

    let mut scene = Scene::new();
    scene.register_template(Template::new("Crate").with_part(Marker));
    let mut world = World::new(scene);
    world.spawn(Spawn::default()).unwrap();

    let tagged = world.spawn(Spawn::default()).unwrap();
    world.tags_mut(tagged).unwrap().add(ENEMY);
    assert_eq!(world.find_first_with_tag(ENEMY), Some(tagged));

    let from_template = world.spawn(Spawn::template("Crate")).unwrap();
    assert_eq!(world.find_first_with_part::<Marker>(), Some(from_template));
}

#[derive(Clone, Default)]
struct Marker;
impl Part for Marker {}

#[test]
fn worlds_are_independent() {
    let mut first = World::new(Scene::new());
    let mut second = World::new(Scene::new());

    let entity = first.spawn(Spawn::default()).unwrap();
    first.get_or_add::<A>(entity).unwrap();
    second.spawn(Spawn::default()).unwrap();

    assert_eq!(first.find_all_with_part::<A>().len(), 1);
    assert!(second.find_all_with_part::<A>().is_empty());
}
