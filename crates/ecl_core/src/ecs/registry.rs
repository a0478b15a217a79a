//! Ordered registry of live entities

use super::Entity;
use crate::{EclError, Result};

/// All live entities of a world, in registration order
///
/// Scans are linear and always walk registration order, so "first match"
/// means "first created".
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity
    ///
    /// Uniqueness is the caller's responsibility.
    pub fn register(&mut self, entity: Entity) {
        debug_assert!(
            !self.entities.contains(&entity),
            "entity {entity:?} registered twice"
        );
        self.entities.push(entity);
    }

    /// Remove an entity, keeping the order of the others
    pub fn unregister(&mut self, entity: Entity) -> Result<()> {
        let index = self
            .entities
            .iter()
            .position(|e| *e == entity)
            .ok_or(EclError::NotRegistered(entity))?;
        self.entities.remove(index);
        Ok(())
    }

    /// Check if an entity is registered
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// First entity matching the predicate
    pub fn find_first(&self, mut predicate: impl FnMut(Entity) -> bool) -> Option<Entity> {
        self.entities.iter().copied().find(|e| predicate(*e))
    }

    /// Every entity matching the predicate, in registration order
    pub fn find_all(&self, mut predicate: impl FnMut(Entity) -> bool) -> Vec<Entity> {
        self.entities
            .iter()
            .copied()
            .filter(|e| predicate(*e))
            .collect()
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Registered entities as a slice
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Entity count
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn handles(n: usize) -> Vec<Entity> {
        let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
        (0..n).map(|_| keys.insert(())).collect()
    }

    #[test]
    fn test_live_set_follows_register_and_unregister() {
        let e = handles(4);
        let mut registry = EntityRegistry::new();
        for entity in &e {
            registry.register(*entity);
        }

        registry.unregister(e[1]).unwrap();
        registry.unregister(e[3]).unwrap();
        registry.register(e[3]);

        assert_eq!(registry.as_slice(), &[e[0], e[2], e[3]]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.contains(e[1]));
    }

    #[test]
    fn test_unregister_absent_is_an_error() {
        let e = handles(1);
        let mut registry = EntityRegistry::new();

        assert_eq!(registry.unregister(e[0]), Err(EclError::NotRegistered(e[0])));
    }

    #[test]
    fn test_scans_keep_registration_order() {
        let e = handles(5);
        let mut registry = EntityRegistry::new();
        for entity in &e {
            registry.register(*entity);
        }

        let odd = |entity: Entity| entity == e[1] || entity == e[3];
        assert_eq!(registry.find_first(odd), Some(e[1]));
        assert_eq!(registry.find_all(odd), vec![e[1], e[3]]);
        assert_eq!(registry.find_first(|_| false), None);
    }
}
