use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecl_core::prelude::*;

#[derive(Default)]
struct Velocity(Vec3);
impl Part for Velocity {}

#[derive(Default)]
struct Position(Vec3);
impl Part for Position {}

#[derive(Default)]
struct Frozen;
impl Part for Frozen {}

#[derive(Default)]
struct Integrate;

impl Part for Integrate {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Integrate {
    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        let velocity = ctx.get::<Velocity>()?.map_or(Vec3::ZERO, |v| v.0);
        ctx.get_or_add::<Position>()?.0 += velocity;
        Ok(())
    }
}

fn populated(count: usize) -> World {
    let mut world = World::new(Scene::new());
    for i in 0..count {
        let entity = world.spawn(Spawn::default()).unwrap();
        world.get_or_add::<Velocity>(entity).unwrap().0 = Vec3::new(i as f32, 0.0, 0.0);
        world.get_or_add::<Integrate>(entity).unwrap();
        if i % 3 == 0 {
            world.get_or_add::<Frozen>(entity).unwrap();
        }
    }
    world.tick();
    world
}

fn bench_tick(c: &mut Criterion) {
    let mut world = populated(1_000);
    c.bench_function("tick 1000 logics", |b| b.iter(|| black_box(world.tick())));
}

fn bench_filter(c: &mut Criterion) {
    let world = populated(1_000);
    c.bench_function("filter exclude", |b| {
        b.iter(|| {
            let moving = world.filter::<(Velocity, Position)>().exclude::<Frozen>(&world);
            black_box(moving.len())
        })
    });
}

criterion_group!(benches, bench_tick, bench_filter);
criterion_main!(benches);
