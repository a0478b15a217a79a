//! Filter snapshots over the entity population

use super::{Entity, Part, World};
use std::ops::Index;

/// Part type tuples a [`Filter`] can be made from
///
/// Implemented for `(A,)`, `(A, B)` and `(A, B, C)`.
pub trait PartQuery {
    /// Entities carrying every part of the tuple, in registration order
    fn build(world: &World) -> Filter;
}

impl<A: Part> PartQuery for (A,) {
    fn build(world: &World) -> Filter {
        Filter::new(world, world.find_all_with_part::<A>())
    }
}

impl<A: Part, B: Part> PartQuery for (A, B) {
    fn build(world: &World) -> Filter {
        <(A,)>::build(world).require::<B>(world)
    }
}

impl<A: Part, B: Part, C: Part> PartQuery for (A, B, C) {
    fn build(world: &World) -> Filter {
        <(A, B)>::build(world).require::<C>(world)
    }
}

/// Immutable, ordered snapshot of entities
///
/// A filter never updates itself. Narrowing returns a new filter holding an
/// order-preserving subsequence of this one.
///
/// # Example
///
/// ```rust
/// use ecl_core::ecs::{Filter, Part, World};
/// use ecl_core::scene::Scene;
///
/// #[derive(Default)]
/// struct Enemy;
/// impl Part for Enemy {}
///
/// #[derive(Default)]
/// struct Dead;
/// impl Part for Dead {}
///
/// let mut world = World::new(Scene::new());
/// let a = world.spawn(Default::default()).unwrap();
/// let b = world.spawn(Default::default()).unwrap();
/// world.get_or_add::<Enemy>(a).unwrap();
/// world.get_or_add::<Enemy>(b).unwrap();
/// world.get_or_add::<Dead>(b).unwrap();
///
/// let alive = Filter::make::<(Enemy,)>(&world).exclude::<Dead>(&world);
/// assert_eq!(alive.as_slice(), &[a]);
/// ```
#[derive(Clone, Debug)]
pub struct Filter {
    entities: Vec<Entity>,
    tick: u64,
    version: u64,
}

impl Filter {
    fn new(world: &World, entities: Vec<Entity>) -> Self {
        Self {
            entities,
            tick: world.tick_count(),
            version: world.version(),
        }
    }

    /// Snapshot of the entities carrying every part of `Q`
    pub fn make<Q: PartQuery>(world: &World) -> Self {
        Q::build(world)
    }

    /// Keep the entries that do not carry a part of type `T`
    ///
    /// The result keeps this snapshot's stamps, so narrowing a stale
    /// snapshot yields a stale one.
    pub fn exclude<T: Part>(&self, world: &World) -> Self {
        self.narrow(|entity| !world.has_part::<T>(entity))
    }

    /// Keep the entries that carry a part of type `T`
    pub(crate) fn require<T: Part>(&self, world: &World) -> Self {
        self.narrow(|entity| world.has_part::<T>(entity))
    }

    fn narrow(&self, mut keep: impl FnMut(Entity) -> bool) -> Self {
        Self {
            entities: self.entities.iter().copied().filter(|e| keep(*e)).collect(),
            tick: self.tick,
            version: self.version,
        }
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity at a position
    pub fn get(&self, index: usize) -> Option<Entity> {
        self.entities.get(index).copied()
    }

    /// Iterate in order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Entities as a slice
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Tick the snapshot was taken on
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Check that no entity or part was added or removed since the snapshot
    pub fn is_current(&self, world: &World) -> bool {
        self.version == world.version()
    }
}

/// Filters are equal when they hold the same entities in the same order
impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.entities == other.entities
    }
}

impl Eq for Filter {}

impl Index<usize> for Filter {
    type Output = Entity;

    fn index(&self, index: usize) -> &Entity {
        &self.entities[index]
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = Entity;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Entity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter().copied()
    }
}
