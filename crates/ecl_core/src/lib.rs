//! # ECL core
//!
//! Entity / part / logic framework layered on a host scene graph.
//!
//! This crate provides:
//! - **Entities** tracked in an explicit, ordered registry
//! - **Parts** attached to entities with get-or-add semantics
//! - **Logics** run once per tick in static priority order
//! - **Filters** built by intersecting and excluding part sets
//! - **Scene** contract plus an in-memory host
//!
//! ## Quick Start
//!
//! ```rust
//! use ecl_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Position(Vec3);
//!
//! impl Part for Position {}
//!
//! #[derive(Default)]
//! struct Drift;
//!
//! impl Part for Drift {
//!     fn as_logic(&mut self) -> Option<&mut dyn Logic> {
//!         Some(self)
//!     }
//! }
//!
//! impl Logic for Drift {
//!     fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
//!         ctx.get_or_add::<Position>()?.0 += Vec3::UP;
//!         Ok(())
//!     }
//! }
//!
//! let mut world = World::new(Scene::new());
//! let entity = world.spawn(Spawn::empty("Balloon")).unwrap();
//! world.get_or_add::<Drift>(entity).unwrap();
//!
//! world.tick();
//! world.tick();
//!
//! let position = world.get::<Position>(entity).unwrap().unwrap();
//! assert_eq!(position.0, Vec3::new(0.0, 2.0, 0.0));
//! ```

pub mod ecs;
pub mod error;
pub mod math;
pub mod prelude;
pub mod scene;

pub use ecs::{Entity, Filter, Logic, Part, World};
pub use error::{EclError, Result, RunFailure};
pub use scene::{ObjectId, Scene, SceneHost};
