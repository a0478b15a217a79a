//! The world: entities, their scene host and the logic scheduler

use super::{
    Entity, EntityRecord, EntityRegistry, Events, Filter, Logic, LogicContext, LogicInfo,
    LogicState, Part, PartQuery, PartStore, Scheduler, SchedulerConfig, Spawn, SpawnSource, Tag,
    Tags, TickReport,
};
use crate::scene::{ObjectId, SceneHost};
use crate::{EclError, Result, RunFailure};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::any::{type_name, TypeId};

/// Context object owning everything an application needs per scene
///
/// Parts live on the host's scene objects; the world keeps the entity
/// records, the ordered registry of live entities and the scheduler. There
/// is no global state, so any number of worlds can exist side by side.
pub struct World {
    host: Box<dyn SceneHost>,
    records: SlotMap<Entity, EntityRecord>,
    by_object: FxHashMap<ObjectId, Entity>,
    registry: EntityRegistry,
    scheduler: Scheduler,
    /// Completed ticks
    tick: u64,
    /// Bumped whenever an entity or a part is added or removed
    version: u64,
    in_tick: bool,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.registry.len())
            .field("logics", &self.scheduler.len())
            .field("tick", &self.tick)
            .field("version", &self.version)
            .finish()
    }
}

impl World {
    /// Create a world over a scene host
    pub fn new(host: impl SceneHost + 'static) -> Self {
        Self::with_config(host, SchedulerConfig::default())
    }

    /// Create a world with explicit scheduler settings
    pub fn with_config(host: impl SceneHost + 'static, config: SchedulerConfig) -> Self {
        Self {
            host: Box::new(host),
            records: SlotMap::with_key(),
            by_object: FxHashMap::default(),
            registry: EntityRegistry::new(),
            scheduler: Scheduler::with_config(config),
            tick: 0,
            version: 0,
            in_tick: false,
        }
    }

    /// The scene host
    pub fn host(&self) -> &dyn SceneHost {
        self.host.as_ref()
    }

    /// The scene host, mutably
    ///
    /// Objects destroyed directly through the host leave their entity
    /// behind as a stale handle; use [`World::destroy`] instead.
    pub fn host_mut(&mut self) -> &mut dyn SceneHost {
        self.host.as_mut()
    }

    /// The scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The registry of live entities
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    // ========== Entity lifecycle ==========

    /// Attach a new entity to an existing scene object
    ///
    /// Logics already on the object (for example from a template) are
    /// queued and initialised in attachment order.
    pub fn attach(&mut self, object: ObjectId) -> Result<Entity> {
        if !self.host.contains(object) {
            return Err(EclError::MissingObject(object));
        }
        if let Some(entity) = self.by_object.get(&object) {
            return Err(EclError::DuplicateAttach {
                object,
                entity: *entity,
            });
        }

        let entity = self.records.insert(EntityRecord::new(object));
        self.by_object.insert(object, entity);
        self.registry.register(entity);
        self.version += 1;
        tracing::debug!(?entity, ?object, "entity attached");

        let logics = self
            .host
            .parts_mut(object)
            .map(PartStore::logics)
            .unwrap_or_default();
        for info in logics {
            self.schedule_logic(entity, info);
        }
        Ok(entity)
    }

    /// Attach entities to every host object that has none, in creation order
    pub fn adopt_scene(&mut self) -> Result<Vec<Entity>> {
        let orphans: Vec<ObjectId> = self
            .host
            .objects()
            .into_iter()
            .filter(|object| !self.by_object.contains_key(object))
            .collect();
        orphans
            .into_iter()
            .map(|object| self.attach(object))
            .collect()
    }

    /// Create an object and its entity
    ///
    /// If the new object already carries an entity that entity is reused.
    /// A failure after the object was created tears the object down again.
    pub fn spawn(&mut self, request: Spawn) -> Result<Entity> {
        let object = match &request.source {
            SpawnSource::Empty(name) => self.host.create_object(name),
            SpawnSource::Template(name) => self.host.instantiate(name)?,
        };

        let placed = self
            .host
            .set_transform(object, request.position, request.rotation)
            .and_then(|()| match request.parent {
                Some(parent) => self.host.set_parent(object, Some(parent)),
                None => Ok(()),
            });
        if let Err(err) = placed {
            self.host.destroy_object(object);
            return Err(err);
        }

        match self.entity_of(object) {
            Some(entity) => Ok(entity),
            None => self.attach(object),
        }
    }

    /// Destroy an entity, its scene object and the object's descendants
    ///
    /// Entities on descendant objects are destroyed as well. Destroying the
    /// running logic's own entity is allowed; the logic finishes its hook
    /// and is dropped afterwards.
    pub fn destroy(&mut self, entity: Entity) -> Result<()> {
        let object = self.object_of(entity)?;
        self.forget(entity)?;

        let removed = self.host.destroy_object(object);
        for descendant in removed.iter().skip(1) {
            if let Some(child) = self.by_object.get(descendant).copied() {
                self.forget(child)?;
            }
        }
        tracing::debug!(?entity, objects = removed.len(), "entity destroyed");
        Ok(())
    }

    fn forget(&mut self, entity: Entity) -> Result<()> {
        let record = self
            .records
            .remove(entity)
            .ok_or(EclError::StaleHandle(entity))?;
        self.by_object.remove(&record.object());
        self.registry.unregister(entity)?;
        let cancelled = self.scheduler.cancel_entity(entity);
        self.version += 1;
        tracing::trace!(?entity, cancelled, "entity forgotten");
        Ok(())
    }

    /// Entity attached to a scene object
    pub fn entity_of(&self, object: ObjectId) -> Option<Entity> {
        self.by_object.get(&object).copied()
    }

    /// Scene object behind an entity
    pub fn object_of(&self, entity: Entity) -> Result<ObjectId> {
        self.record(entity).map(EntityRecord::object)
    }

    /// Check if an entity is live
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.records
            .get(entity)
            .is_some_and(|record| self.host.contains(record.object()))
    }

    /// Entity record
    pub fn record(&self, entity: Entity) -> Result<&EntityRecord> {
        self.records
            .get(entity)
            .ok_or(EclError::StaleHandle(entity))
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord> {
        self.records
            .get_mut(entity)
            .ok_or(EclError::StaleHandle(entity))
    }

    /// Live entities in registration order
    pub fn entities(&self) -> &[Entity] {
        self.registry.as_slice()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Population version, changes whenever an entity or part is added or removed
    pub fn version(&self) -> u64 {
        self.version
    }

    // ========== Parts ==========

    fn store(&self, entity: Entity) -> Result<&PartStore> {
        let object = self.object_of(entity)?;
        self.host
            .parts(object)
            .ok_or(EclError::StaleHandle(entity))
    }

    fn store_mut(&mut self, entity: Entity) -> Result<&mut PartStore> {
        let object = self.object_of(entity)?;
        self.host
            .parts_mut(object)
            .ok_or(EclError::StaleHandle(entity))
    }

    /// Get the part of type `T`, attaching a default one if absent
    ///
    /// A newly attached logic is queued as pending and its `init` hook runs
    /// before this returns.
    pub fn get_or_add<T: Part + Default>(&mut self, entity: Entity) -> Result<&mut T> {
        self.attach_part(entity, T::default)
    }

    /// Attach `part` unless the entity already has a part of type `T`
    ///
    /// Returns the attached part; if one was already there it is returned
    /// and `part` is dropped.
    pub fn get_or_insert<T: Part>(&mut self, entity: Entity, part: T) -> Result<&mut T> {
        self.attach_part(entity, || part)
    }

    fn attach_part<T: Part>(&mut self, entity: Entity, make: impl FnOnce() -> T) -> Result<&mut T> {
        let (inserted, logic) = {
            let store = self.store_mut(entity)?;
            let (_, inserted) = store.get_or_insert_with(make)?;
            let logic = if inserted {
                store.logic_info(TypeId::of::<T>())
            } else {
                None
            };
            (inserted, logic)
        };

        if inserted {
            self.version += 1;
            tracing::trace!(?entity, part = type_name::<T>(), "part added");
        }
        if let Some(info) = logic {
            self.schedule_logic(entity, info);
        }

        self.store_mut(entity)?
            .get_mut::<T>()
            .ok_or(EclError::MissingPart(type_name::<T>()))
    }

    /// Get a part if the entity has one
    pub fn get<T: Part>(&self, entity: Entity) -> Result<Option<&T>> {
        Ok(self.store(entity)?.get::<T>())
    }

    /// Get a part mutably if the entity has one
    pub fn get_mut<T: Part>(&mut self, entity: Entity) -> Result<Option<&mut T>> {
        Ok(self.store_mut(entity)?.get_mut::<T>())
    }

    /// Check if the entity has a part of type `T`
    pub fn has<T: Part>(&self, entity: Entity) -> Result<bool> {
        Ok(self.store(entity)?.contains::<T>())
    }

    /// Remove the part of type `T`, returns whether one was attached
    ///
    /// Removing a logic also removes it from the scheduler.
    pub fn delete<T: Part>(&mut self, entity: Entity) -> Result<bool> {
        let part = TypeId::of::<T>();
        let removed = self.store_mut(entity)?.remove_type(part);
        if removed {
            self.scheduler.cancel(entity, part);
            self.version += 1;
            tracing::trace!(?entity, part = type_name::<T>(), "part deleted");
        }
        Ok(removed)
    }

    /// Same as [`World::has`] but `false` for stale handles
    pub(crate) fn has_part<T: Part>(&self, entity: Entity) -> bool {
        self.store(entity)
            .is_ok_and(|store| store.contains::<T>())
    }

    fn part_of<T: Part>(&self, entity: Entity) -> Option<&T> {
        self.store(entity).ok()?.get::<T>()
    }

    // ========== Tags and events ==========

    /// Tags of an entity, `None` if none were ever added
    pub fn tags(&self, entity: Entity) -> Result<Option<&Tags>> {
        Ok(self.record(entity)?.tags())
    }

    /// Tags of an entity, created on first access
    pub fn tags_mut(&mut self, entity: Entity) -> Result<&mut Tags> {
        Ok(self.record_mut(entity)?.tags_mut())
    }

    /// Check if an entity carries a tag
    pub fn has_tag(&self, entity: Entity, tag: Tag) -> Result<bool> {
        Ok(self.record(entity)?.has_tag(tag))
    }

    /// Event dispatcher of an entity, created on first access
    pub fn events_mut(&mut self, entity: Entity) -> Result<&mut Events> {
        Ok(self.record_mut(entity)?.events_mut())
    }

    /// Emit an event on an entity, returns the number of handlers invoked
    pub fn emit<E: 'static>(&mut self, entity: Entity, event: &E) -> Result<usize> {
        let record = self.record_mut(entity)?;
        Ok(record.events_if_created().map_or(0, |events| events.emit(event)))
    }

    // ========== Finders ==========

    /// First entity (in registration order) with a part of type `T`
    pub fn find_first_with_part<T: Part>(&self) -> Option<Entity> {
        self.registry.find_first(|entity| self.has_part::<T>(entity))
    }

    /// Every entity with a part of type `T`
    pub fn find_all_with_part<T: Part>(&self) -> Vec<Entity> {
        self.registry.find_all(|entity| self.has_part::<T>(entity))
    }

    /// First entity carrying a tag
    pub fn find_first_with_tag(&self, tag: Tag) -> Option<Entity> {
        self.registry.find_first(|entity| self.tagged(entity, tag))
    }

    /// Every entity carrying a tag
    pub fn find_all_with_tag(&self, tag: Tag) -> Vec<Entity> {
        self.registry.find_all(|entity| self.tagged(entity, tag))
    }

    fn tagged(&self, entity: Entity, tag: Tag) -> bool {
        self.records
            .get(entity)
            .is_some_and(|record| record.has_tag(tag))
    }

    /// First part of type `T` on any entity, oldest entity first
    ///
    /// A logic that is running right now is not returned.
    pub fn find_part<T: Part>(&self) -> Option<&T> {
        self.registry.iter().find_map(|entity| self.part_of::<T>(entity))
    }

    /// Every part of type `T`, in registration order of their entities
    pub fn find_all_parts<T: Part>(&self) -> Vec<&T> {
        self.registry
            .iter()
            .filter_map(|entity| self.part_of::<T>(entity))
            .collect()
    }

    /// Snapshot of the entities carrying every part of `Q`
    pub fn filter<Q: PartQuery>(&self) -> Filter {
        Filter::make::<Q>(self)
    }

    // ========== Logics ==========

    /// Scheduler state of the logic `L` on an entity
    pub fn logic_state<L: Logic>(&self, entity: Entity) -> Result<Option<LogicState>> {
        self.record(entity)?;
        Ok(self.scheduler.state(entity, TypeId::of::<L>()))
    }

    /// Enable or disable the logic `L` on an entity
    ///
    /// Disabled logics stay scheduled but are skipped by [`World::tick`].
    /// Returns whether the entity has such a logic.
    pub fn set_logic_enabled<L: Logic>(&mut self, entity: Entity, enabled: bool) -> Result<bool> {
        self.record(entity)?;
        Ok(self
            .scheduler
            .set_enabled(entity, TypeId::of::<L>(), enabled))
    }

    fn schedule_logic(&mut self, entity: Entity, info: LogicInfo) {
        self.scheduler
            .enqueue(entity, info.part, info.name, info.priority);
        self.with_logic(entity, info.part, |logic, ctx| logic.init(ctx));
    }

    /// Check a logic out of its store, hand it a context, check it back in
    ///
    /// Returns `None` if the logic is gone or already checked out. A logic
    /// deleted while checked out is dropped here.
    fn with_logic<R>(
        &mut self,
        entity: Entity,
        part: TypeId,
        hook: impl FnOnce(&mut dyn Logic, &mut LogicContext<'_>) -> R,
    ) -> Option<R> {
        let object = self.records.get(entity)?.object();
        let mut boxed = self.host.parts_mut(object)?.check_out(part)?;

        let result = match boxed.logic_mut() {
            Some(logic) => {
                let mut ctx = LogicContext::new(&mut *self, entity);
                Some(hook(logic, &mut ctx))
            }
            None => None,
        };

        if let Some(store) = self.host.parts_mut(object) {
            store.check_in(part, boxed);
        }
        result
    }

    /// Advance one tick
    ///
    /// Promotes every pending logic (calling `post_init` on each), then runs
    /// the scheduled logics from lowest to highest priority. Entries whose
    /// entity was destroyed earlier in the same tick are skipped; disabled
    /// entries and entries on inactive objects are counted as skipped.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a logic hook.
    pub fn tick(&mut self) -> TickReport {
        assert!(!self.in_tick, "World::tick called from inside a logic hook");
        self.in_tick = true;
        let guard = TickGuard(self);
        guard.0.run_tick()
    }

    fn run_tick(&mut self) -> TickReport {
        self.tick += 1;

        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        let promoted = self.scheduler.promote();
        report.promoted = promoted.len();
        for id in promoted {
            if !self.scheduler.is_scheduled(id) {
                continue;
            }
            if let Some(entry) = self.scheduler.entry(id).copied() {
                self.with_logic(entry.entity, entry.part, |logic, ctx| logic.post_init(ctx));
            }
        }

        for id in self.scheduler.run_order() {
            let Some(entry) = self.scheduler.entry(id).copied() else {
                continue;
            };
            let Some(object) = self.records.get(entry.entity).map(EntityRecord::object) else {
                continue;
            };
            if !entry.enabled || !self.host.is_active(object) {
                report.skipped += 1;
                continue;
            }

            tracing::trace!(logic = entry.name, entity = ?entry.entity, "run");
            match self.with_logic(entry.entity, entry.part, |logic, ctx| logic.run(ctx)) {
                Some(Ok(())) => report.ran += 1,
                Some(Err(error)) => {
                    report.ran += 1;
                    tracing::error!(
                        logic = entry.name,
                        entity = ?entry.entity,
                        "logic failed: {error:#}"
                    );
                    report.failures.push(RunFailure {
                        entity: entry.entity,
                        logic: entry.name,
                        error,
                    });
                }
                None => {}
            }
        }

        report
    }
}

/// Clears the in-tick flag on the way out, unwinding included
struct TickGuard<'w>(&'w mut World);

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.in_tick = false;
    }
}
