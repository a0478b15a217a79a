//! Demo scene driven by the `ecl-demo` binary
//!
//! A director spawns waves of enemies from a template. Enemies drift along
//! their velocity and decay until they destroy themselves; the app stops
//! once the last wave is gone.

use crate::config::Settings;
use crate::launcher::Launcher;
use anyhow::Result;
use ecl_core::prelude::*;
use std::ops::ControlFlow;

/// Template name of the enemies
pub const ENEMY_TEMPLATE: &str = "Enemy";

/// Hit points
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Health(pub i32);

impl Part for Health {}

/// Displacement per tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec3);

impl Part for Velocity {}

/// Moves the object by its velocity every tick
#[derive(Clone, Default)]
pub struct Move;

impl Part for Move {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Move {
    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        let Some(velocity) = ctx.get::<Velocity>()?.map(|v| v.0) else {
            return Ok(());
        };
        let object = ctx.world().object_of(ctx.entity())?;
        let host = ctx.world_mut().host_mut();
        let transform = host.transform(object).unwrap_or_default();
        host.set_transform(object, transform.position + velocity, transform.rotation)?;
        Ok(())
    }
}

/// Loses one hit point per tick and destroys the entity at zero
#[derive(Clone, Default)]
pub struct Decay;

impl Part for Decay {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Decay {
    fn priority(&self) -> i8 {
        1
    }

    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        let health = ctx.get_or_add::<Health>()?;
        health.0 -= 1;
        if health.0 <= 0 {
            tracing::debug!(entity = ?ctx.entity(), tick = ctx.tick(), "decayed");
            ctx.destroy()?;
        }
        Ok(())
    }
}

/// Turns the object a little every tick
#[derive(Default)]
pub struct Spin {
    /// Radians per tick around the up axis
    pub speed: f32,
}

impl Part for Spin {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Spin {
    fn priority(&self) -> i8 {
        2
    }

    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        let object = ctx.world().object_of(ctx.entity())?;
        let host = ctx.world_mut().host_mut();
        let transform = host.transform(object).unwrap_or_default();
        let step = Quat::from_axis_angle(Vec3::UP, self.speed);
        host.set_transform(object, transform.position, (step * transform.rotation).normalize())?;
        Ok(())
    }
}

/// Spawns a wave of enemies every `interval` ticks
pub struct Spawner {
    pub interval: u64,
    pub waves_left: u32,
    pub per_wave: u32,
    pub enemy: Tag,
}

impl Part for Spawner {
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        Some(self)
    }
}

impl Logic for Spawner {
    fn priority(&self) -> i8 {
        -1
    }

    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
        if self.waves_left == 0 || (ctx.tick() - 1) % self.interval.max(1) != 0 {
            return Ok(());
        }
        self.waves_left -= 1;

        let world = ctx.world_mut();
        for i in 0..self.per_wave {
            let enemy = world.spawn(
                Spawn::template(ENEMY_TEMPLATE).at(Vec3::new(i as f32 * 2.0, 0.0, 10.0)),
            )?;
            world.tags_mut(enemy)?.add(self.enemy);
        }
        tracing::info!(
            tick = ctx.tick(),
            spawned = self.per_wave,
            waves_left = self.waves_left,
            "wave spawned"
        );
        Ok(())
    }
}

/// Scene host with the demo templates registered
pub fn scene() -> Scene {
    let mut scene = Scene::new();
    scene.register_template(
        Template::new(ENEMY_TEMPLATE)
            .with_part(Health(3))
            .with_part(Velocity(Vec3::new(0.0, 0.0, -1.0)))
            .with_part(Move)
            .with_part(Decay),
    );
    scene
}

/// Builds the demo scene and stops once every wave is gone
pub struct DemoLauncher {
    player: Tag,
    enemy: Tag,
    waves: u32,
}

impl DemoLauncher {
    /// Create a launcher, declaring the tags it needs in `settings`
    pub fn new(settings: &mut Settings, waves: u32) -> Self {
        Self {
            player: settings.tags.declare("Player"),
            enemy: settings.tags.declare("Enemy"),
            waves,
        }
    }
}

impl Launcher for DemoLauncher {
    fn start(&mut self, world: &mut World) -> Result<()> {
        let player = world.spawn(Spawn::empty("Player"))?;
        world.tags_mut(player)?.add(self.player);
        world.get_or_insert(player, Spin { speed: 0.1 })?;

        let director = world.spawn(Spawn::empty("Director"))?;
        world.get_or_insert(
            director,
            Spawner {
                interval: 2,
                waves_left: self.waves,
                per_wave: 2,
                enemy: self.enemy,
            },
        )?;

        world.host_mut().create_object("Ground");
        Ok(())
    }

    fn on_frame(&mut self, world: &mut World, report: &TickReport) -> ControlFlow<()> {
        let enemies = world.find_all_with_tag(self.enemy).len();
        tracing::debug!(tick = report.tick, enemies, ran = report.ran, "frame");

        let waves_left = world.find_part::<Spawner>().map_or(0, |s| s.waves_left);
        if waves_left == 0 && enemies == 0 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::App;

    #[test]
    fn test_demo_runs_until_the_last_wave_is_gone() {
        let mut settings = Settings::default();
        let mut launcher = DemoLauncher::new(&mut settings, 2);
        let mut app = App::new(scene(), settings);

        let stats = app.run(&mut launcher, Some(100)).unwrap();

        assert_eq!(stats.frames, 6);
        assert_eq!(stats.failures, 0);
        assert_eq!(app.world().entity_count(), 3);
        assert_eq!(app.settings().tag("Enemy"), Some(launcher.enemy));
        assert!(app.world().find_part::<Health>().is_none());
    }

    #[test]
    fn test_enemies_move_and_decay() {
        let mut world = World::new(scene());
        let enemy = world
            .spawn(Spawn::template(ENEMY_TEMPLATE).at(Vec3::new(0.0, 0.0, 10.0)))
            .unwrap();
        let object = world.object_of(enemy).unwrap();

        world.tick();
        world.tick();

        assert_eq!(world.get::<Health>(enemy).unwrap(), Some(&Health(1)));
        assert_eq!(
            world.host().transform(object).unwrap().position,
            Vec3::new(0.0, 0.0, 8.0)
        );

        world.tick();
        assert!(!world.is_alive(enemy));
    }
}
