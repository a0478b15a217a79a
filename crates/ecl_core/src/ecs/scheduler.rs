//! Logic scheduling
//!
//! Two containers, one promotion step:
//!
//! ```text
//! attach logic ──► pending ──(tick start)──► run-list (sorted by priority)
//!                     │                          │
//!                     └──── delete / destroy ────┴──► removed
//! ```
//!
//! The run-list is never changed while a tick walks it: the world iterates
//! a snapshot of ids and skips ids that were cancelled in the meantime.

use super::Entity;
use crate::RunFailure;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::any::TypeId;

new_key_type! {
    /// Identifier of one scheduled logic instance
    pub struct LogicId;
}

/// Scheduler settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Lowest accepted priority
    #[serde(default = "default_min_priority")]
    pub min_priority: i8,
    /// Highest accepted priority
    #[serde(default = "default_max_priority")]
    pub max_priority: i8,
}

fn default_min_priority() -> i8 {
    -3
}

fn default_max_priority() -> i8 {
    3
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_priority: default_min_priority(),
            max_priority: default_max_priority(),
        }
    }
}

/// Where a logic is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicState {
    /// Created, waiting for the next tick's promotion
    Pending,
    /// In the run-list
    Scheduled,
}

/// One logic instance known to the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogicEntry {
    /// Entity owning the logic
    pub entity: Entity,
    /// Part type of the logic
    pub part: TypeId,
    /// Type name of the logic
    pub name: &'static str,
    /// Clamped priority
    pub priority: i8,
    /// Lifecycle state
    pub state: LogicState,
    /// Per-logic enable flag (the object's active state is checked separately)
    pub enabled: bool,
}

/// Outcome of one tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Logics moved from pending into the run-list
    pub promoted: usize,
    /// Logics whose `run` hook was invoked
    pub ran: usize,
    /// Scheduled logics skipped because they were disabled
    pub skipped: usize,
    /// Logics whose `run` hook returned an error
    pub failures: Vec<RunFailure>,
}

impl TickReport {
    /// Check if every invoked logic succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pending set plus priority-sorted run-list
#[derive(Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
    entries: SlotMap<LogicId, LogicEntry>,
    index: FxHashMap<(Entity, TypeId), LogicId>,
    pending: Vec<LogicId>,
    run_list: Vec<LogicId>,
}

impl Scheduler {
    /// Create a scheduler with the default priority range
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create a scheduler with explicit settings
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            entries: SlotMap::with_key(),
            index: FxHashMap::default(),
            pending: Vec::new(),
            run_list: Vec::new(),
        }
    }

    /// Active settings
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Clamp a requested priority into the configured range
    pub fn clamp_priority(&self, name: &str, priority: i8) -> i8 {
        let clamped = priority.clamp(self.config.min_priority, self.config.max_priority);
        if clamped != priority {
            tracing::warn!(
                logic = name,
                requested = priority,
                clamped,
                "logic priority out of range"
            );
        }
        clamped
    }

    /// Queue a new logic as pending
    ///
    /// Queuing the same part of the same entity twice returns the existing id.
    pub fn enqueue(
        &mut self,
        entity: Entity,
        part: TypeId,
        name: &'static str,
        priority: i8,
    ) -> LogicId {
        if let Some(id) = self.index.get(&(entity, part)) {
            return *id;
        }
        let priority = self.clamp_priority(name, priority);
        let id = self.entries.insert(LogicEntry {
            entity,
            part,
            name,
            priority,
            state: LogicState::Pending,
            enabled: true,
        });
        self.index.insert((entity, part), id);
        self.pending.push(id);
        tracing::trace!(logic = name, ?entity, priority, "logic pending");
        id
    }

    /// Move every pending logic into the run-list
    ///
    /// Returns the promoted ids in creation order.
    pub fn promote(&mut self) -> Vec<LogicId> {
        let promoted = std::mem::take(&mut self.pending);
        for id in &promoted {
            if let Some(entry) = self.entries.get_mut(*id) {
                entry.state = LogicState::Scheduled;
                self.insert_sorted(*id);
            }
        }
        promoted
    }

    /// Insert before the first entry with a strictly greater priority, so
    /// equal priorities keep creation order.
    fn insert_sorted(&mut self, id: LogicId) {
        let Some(priority) = self.entries.get(id).map(|e| e.priority) else {
            return;
        };
        let position = self
            .run_list
            .iter()
            .position(|other| {
                self.entries
                    .get(*other)
                    .is_some_and(|e| e.priority > priority)
            })
            .unwrap_or(self.run_list.len());
        self.run_list.insert(position, id);
    }

    /// Remove one logic from both containers
    pub fn cancel(&mut self, entity: Entity, part: TypeId) -> Option<LogicState> {
        let id = self.index.remove(&(entity, part))?;
        let entry = self.entries.remove(id)?;
        match entry.state {
            LogicState::Pending => self.pending.retain(|other| *other != id),
            LogicState::Scheduled => self.run_list.retain(|other| *other != id),
        }
        tracing::trace!(logic = entry.name, ?entity, "logic cancelled");
        Some(entry.state)
    }

    /// Remove every logic of an entity, returns how many were removed
    pub fn cancel_entity(&mut self, entity: Entity) -> usize {
        let parts: Vec<TypeId> = self
            .entries
            .values()
            .filter(|e| e.entity == entity)
            .map(|e| e.part)
            .collect();
        parts
            .into_iter()
            .filter(|part| self.cancel(entity, *part).is_some())
            .count()
    }

    /// Set the per-logic enable flag, returns whether the logic is known
    pub fn set_enabled(&mut self, entity: Entity, part: TypeId, enabled: bool) -> bool {
        match self.find(entity, part).and_then(|id| self.entries.get_mut(id)) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Look up the id of a logic
    pub fn find(&self, entity: Entity, part: TypeId) -> Option<LogicId> {
        self.index.get(&(entity, part)).copied()
    }

    /// Look up an entry
    pub fn entry(&self, id: LogicId) -> Option<&LogicEntry> {
        self.entries.get(id)
    }

    /// Lifecycle state of a logic, `None` once removed
    pub fn state(&self, entity: Entity, part: TypeId) -> Option<LogicState> {
        self.find(entity, part)
            .and_then(|id| self.entries.get(id))
            .map(|e| e.state)
    }

    /// Check if the id still refers to a scheduled logic
    pub fn is_scheduled(&self, id: LogicId) -> bool {
        self.entries
            .get(id)
            .is_some_and(|e| e.state == LogicState::Scheduled)
    }

    /// Copy of the run-list, head first
    pub fn run_order(&self) -> Vec<LogicId> {
        self.run_list.clone()
    }

    /// Scheduled entries, head first
    pub fn scheduled(&self) -> impl Iterator<Item = &LogicEntry> + '_ {
        self.run_list.iter().filter_map(|id| self.entries.get(*id))
    }

    /// Pending entries in creation order
    pub fn pending(&self) -> impl Iterator<Item = &LogicEntry> + '_ {
        self.pending.iter().filter_map(|id| self.entries.get(*id))
    }

    /// Number of known logics (pending and scheduled)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    fn entities(n: usize) -> Vec<Entity> {
        let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
        (0..n).map(|_| keys.insert(())).collect()
    }

    fn part<T: 'static>() -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn test_promotion_is_a_stable_priority_sort() {
        let e = entities(4);
        let mut scheduler = Scheduler::new();
        for (entity, priority) in e.iter().zip([2, -1, 0, -1]) {
            scheduler.enqueue(*entity, part::<A>(), "A", priority);
        }

        assert_eq!(scheduler.promote().len(), 4);

        let order: Vec<(Entity, i8)> = scheduler
            .scheduled()
            .map(|x| (x.entity, x.priority))
            .collect();
        assert_eq!(order, vec![(e[1], -1), (e[3], -1), (e[2], 0), (e[0], 2)]);
        assert_eq!(scheduler.pending().count(), 0);
    }

    #[test]
    fn test_later_promotions_keep_ties_in_creation_order() {
        let e = entities(3);
        let mut scheduler = Scheduler::new();
        scheduler.enqueue(e[0], part::<A>(), "A", 1);
        scheduler.promote();
        scheduler.enqueue(e[1], part::<A>(), "A", 1);
        scheduler.enqueue(e[2], part::<A>(), "A", -1);
        scheduler.promote();

        let order: Vec<Entity> = scheduler.scheduled().map(|x| x.entity).collect();
        assert_eq!(order, vec![e[2], e[0], e[1]]);
    }

    #[test]
    fn test_priority_is_clamped() {
        let e = entities(1);
        let mut scheduler = Scheduler::new();
        let id = scheduler.enqueue(e[0], part::<A>(), "A", 100);

        assert_eq!(scheduler.entry(id).unwrap().priority, 3);
    }

    #[test]
    fn test_cancel_pending_and_scheduled() {
        let e = entities(1);
        let mut scheduler = Scheduler::new();
        scheduler.enqueue(e[0], part::<A>(), "A", 0);
        scheduler.promote();
        scheduler.enqueue(e[0], part::<B>(), "B", 0);

        assert_eq!(scheduler.state(e[0], part::<A>()), Some(LogicState::Scheduled));
        assert_eq!(scheduler.state(e[0], part::<B>()), Some(LogicState::Pending));

        assert_eq!(scheduler.cancel_entity(e[0]), 2);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.promote().len(), 0);
        assert_eq!(scheduler.scheduled().count(), 0);
        assert_eq!(scheduler.state(e[0], part::<A>()), None);
    }

    #[test]
    fn test_cancelled_id_is_not_scheduled() {
        let e = entities(1);
        let mut scheduler = Scheduler::new();
        let id = scheduler.enqueue(e[0], part::<A>(), "A", 0);
        assert!(!scheduler.is_scheduled(id));
        scheduler.promote();
        assert!(scheduler.is_scheduled(id));

        scheduler.cancel(e[0], part::<A>());
        assert!(!scheduler.is_scheduled(id));
    }

    #[test]
    fn test_enable_flag() {
        let e = entities(1);
        let mut scheduler = Scheduler::new();
        let id = scheduler.enqueue(e[0], part::<A>(), "A", 0);

        assert!(scheduler.set_enabled(e[0], part::<A>(), false));
        assert!(!scheduler.entry(id).unwrap().enabled);
        assert!(!scheduler.set_enabled(e[0], part::<B>(), false));
    }
}
