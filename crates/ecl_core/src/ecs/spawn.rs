//! Entity spawn requests

use crate::math::{Quat, Vec3};
use crate::scene::ObjectId;

/// What a spawned object is built from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnSource {
    /// A fresh object with no parts
    Empty(String),
    /// An instance of a registered template
    Template(String),
}

/// Description of an entity to create with [`World::spawn`](super::World::spawn)
///
/// ```rust
/// use ecl_core::ecs::Spawn;
/// use ecl_core::math::Vec3;
///
/// let request = Spawn::template("Enemy").at(Vec3::new(0.0, 1.0, 0.0));
/// assert!(request.parent.is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Spawn {
    /// Source of the object
    pub source: SpawnSource,
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub rotation: Quat,
    /// Parent object, `None` spawns at the root
    pub parent: Option<ObjectId>,
}

impl Default for Spawn {
    fn default() -> Self {
        Self::empty("Entity")
    }
}

impl Spawn {
    /// Spawn an empty object
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_source(SpawnSource::Empty(name.into()))
    }

    /// Spawn an instance of a template
    pub fn template(name: impl Into<String>) -> Self {
        Self::from_source(SpawnSource::Template(name.into()))
    }

    fn from_source(source: SpawnSource) -> Self {
        Self {
            source,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent: None,
        }
    }

    /// Set the position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the parent object
    pub fn child_of(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }
}
