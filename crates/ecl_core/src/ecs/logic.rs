//! Logic parts and the context they run in

use super::{Entity, Part, Tag, World};
use crate::Result;

/// A part that takes part in the per-tick run pass
///
/// Logics are attached like any other part. Attaching one queues it with
/// the scheduler and calls [`init`](Logic::init) right away; the next tick
/// promotes it, calls [`post_init`](Logic::post_init) and from then on
/// [`run`](Logic::run) once per tick while it is enabled.
///
/// # Example
///
/// ```rust
/// use ecl_core::ecs::{Logic, LogicContext, Part};
///
/// #[derive(Default)]
/// struct Lifetime {
///     frames_left: u32,
/// }
///
/// impl Part for Lifetime {
///     fn as_logic(&mut self) -> Option<&mut dyn Logic> {
///         Some(self)
///     }
/// }
///
/// impl Logic for Lifetime {
///     fn init(&mut self, _ctx: &mut LogicContext<'_>) {
///         self.frames_left = 60;
///     }
///
///     fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
///         self.frames_left = self.frames_left.saturating_sub(1);
///         if self.frames_left == 0 {
///             ctx.destroy()?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Logic: Part {
    /// Static run priority, lower runs first
    ///
    /// Read once when the logic is queued and clamped to the scheduler's
    /// configured range.
    fn priority(&self) -> i8 {
        0
    }

    /// Called once when the logic is attached
    fn init(&mut self, _ctx: &mut LogicContext<'_>) {}

    /// Called once when the logic is promoted into the run-list
    fn post_init(&mut self, _ctx: &mut LogicContext<'_>) {}

    /// Called once per tick while the logic is scheduled and enabled
    fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()>;
}

/// Access to the world from inside a logic hook
///
/// The running logic is checked out of its part store, so the whole world
/// (including the entity's other parts) can be borrowed mutably.
pub struct LogicContext<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> LogicContext<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity) -> Self {
        Self { world, entity }
    }

    /// Entity owning the logic
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The world
    pub fn world(&self) -> &World {
        &*self.world
    }

    /// The world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    /// Current tick number
    pub fn tick(&self) -> u64 {
        self.world.tick_count()
    }

    /// Get (attaching if absent) a part on the owning entity
    pub fn get_or_add<T: Part + Default>(&mut self) -> Result<&mut T> {
        self.world.get_or_add::<T>(self.entity)
    }

    /// Get a part on the owning entity if it exists
    pub fn get<T: Part>(&self) -> Result<Option<&T>> {
        self.world.get::<T>(self.entity)
    }

    /// Get a part on the owning entity mutably if it exists
    pub fn get_mut<T: Part>(&mut self) -> Result<Option<&mut T>> {
        self.world.get_mut::<T>(self.entity)
    }

    /// Check if the owning entity has a part
    pub fn has<T: Part>(&self) -> Result<bool> {
        self.world.has::<T>(self.entity)
    }

    /// Remove a part from the owning entity
    pub fn delete<T: Part>(&mut self) -> Result<bool> {
        self.world.delete::<T>(self.entity)
    }

    /// Check if the owning entity carries a tag
    pub fn has_tag(&self, tag: Tag) -> Result<bool> {
        self.world.has_tag(self.entity, tag)
    }

    /// Destroy the owning entity
    ///
    /// The running logic finishes its hook and is dropped afterwards.
    pub fn destroy(&mut self) -> Result<()> {
        self.world.destroy(self.entity)
    }

    /// First entity with a part of type `T`
    pub fn find_first_with_part<T: Part>(&self) -> Option<Entity> {
        self.world.find_first_with_part::<T>()
    }

    /// Every entity with a part of type `T`
    pub fn find_all_with_part<T: Part>(&self) -> Vec<Entity> {
        self.world.find_all_with_part::<T>()
    }

    /// First entity carrying a tag
    pub fn find_first_with_tag(&self, tag: Tag) -> Option<Entity> {
        self.world.find_first_with_tag(tag)
    }

    /// Every entity carrying a tag
    pub fn find_all_with_tag(&self, tag: Tag) -> Vec<Entity> {
        self.world.find_all_with_tag(tag)
    }

    /// First part of type `T` in the world
    pub fn find_part<T: Part>(&self) -> Option<&T> {
        self.world.find_part::<T>()
    }
}
