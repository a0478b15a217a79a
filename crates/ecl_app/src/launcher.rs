//! Frame driver
//!
//! An [`App`] owns the world. [`App::run`] calls [`Launcher::start`] once,
//! then ticks the world exactly once per frame until the launcher asks to
//! stop or the frame limit is reached.

use crate::config::Settings;
use anyhow::{Context, Result};
use ecl_core::ecs::{TickReport, World};
use ecl_core::scene::SceneHost;
use std::ops::ControlFlow;

/// Application entry point
pub trait Launcher {
    /// Build the initial scene
    ///
    /// Objects created directly through the host are adopted as entities
    /// once this returns.
    fn start(&mut self, world: &mut World) -> Result<()>;

    /// Called after every tick
    fn on_frame(&mut self, _world: &mut World, _report: &TickReport) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Totals over the frames driven by an [`App`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks performed
    pub frames: u64,
    /// Logic `run` hooks invoked
    pub logic_runs: usize,
    /// Logic `run` hooks that returned an error
    pub failures: usize,
}

/// Owns a world and drives it frame by frame
#[derive(Debug)]
pub struct App {
    world: World,
    settings: Settings,
    stats: RunStats,
}

impl App {
    /// Create an app over a scene host
    pub fn new(host: impl SceneHost + 'static, settings: Settings) -> Self {
        Self {
            world: World::with_config(host, settings.scheduler),
            settings,
            stats: RunStats::default(),
        }
    }

    /// The world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Settings the app was created with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Totals so far
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Start the launcher and adopt the objects it created
    pub fn start(&mut self, launcher: &mut impl Launcher) -> Result<()> {
        launcher
            .start(&mut self.world)
            .context("Launcher failed to start")?;
        let adopted = self.world.adopt_scene()?;
        tracing::info!(
            entities = self.world.entity_count(),
            adopted = adopted.len(),
            "scene started"
        );
        Ok(())
    }

    /// Advance one frame
    pub fn step(&mut self) -> TickReport {
        let report = self.world.tick();
        self.stats.frames += 1;
        self.stats.logic_runs += report.ran;
        self.stats.failures += report.failures.len();
        if !report.is_clean() {
            tracing::warn!(
                tick = report.tick,
                failures = report.failures.len(),
                "frame finished with logic failures"
            );
        }
        report
    }

    /// Start the launcher and run frames
    ///
    /// Runs until the launcher breaks, or for at most `frames` frames when a
    /// limit is given.
    pub fn run(&mut self, launcher: &mut impl Launcher, frames: Option<u64>) -> Result<RunStats> {
        self.start(launcher)?;

        let mut remaining = frames;
        while remaining != Some(0) {
            let report = self.step();
            if let Some(left) = remaining.as_mut() {
                *left -= 1;
            }
            if launcher.on_frame(&mut self.world, &report).is_break() {
                tracing::debug!(tick = report.tick, "launcher stopped the app");
                break;
            }
        }

        tracing::info!(
            frames = self.stats.frames,
            logic_runs = self.stats.logic_runs,
            failures = self.stats.failures,
            "app finished"
        );
        Ok(self.stats)
    }
}
