//! Entities, parts and logics
//!
//! ## Overview
//!
//! - **Entity**: handle to one scene object, kept in an ordered registry
//! - **Part**: data attached to an entity, at most one per type
//! - **Logic**: a part with per-tick behaviour, run in priority order
//! - **Filter**: immutable snapshot of the entities carrying a set of parts
//! - **World**: owns the registry, the scheduler and the scene host

mod entity;
mod events;
mod filter;
mod logic;
mod part;
mod registry;
mod scheduler;
mod spawn;
mod tags;
mod world;

pub use entity::{Entity, EntityRecord};
pub use events::{Events, SubscriptionId};
pub use filter::{Filter, PartQuery};
pub use logic::{Logic, LogicContext};
pub use part::{LogicInfo, Part, PartStore};
pub use registry::EntityRegistry;
pub use scheduler::{LogicEntry, LogicId, LogicState, Scheduler, SchedulerConfig, TickReport};
pub use spawn::{Spawn, SpawnSource};
pub use tags::{Tag, Tags};
pub use world::World;
