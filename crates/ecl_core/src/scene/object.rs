//! Scene object data

use super::ObjectId;
use crate::ecs::PartStore;
use crate::math::{Quat, Vec3};
use smallvec::SmallVec;

/// Local position and rotation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,
    /// Rotation relative to the parent
    pub rotation: Quat,
}

impl Transform {
    /// Create a transform
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

/// One node of the in-memory scene
#[derive(Debug)]
pub struct SceneObject {
    /// Display name
    pub name: String,
    /// Local transform
    pub transform: Transform,
    /// Own active flag, ancestors are not considered
    pub active: bool,
    pub(crate) parts: PartStore,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: SmallVec<[ObjectId; 8]>,
}

impl SceneObject {
    /// Create an active root object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            active: true,
            parts: PartStore::new(),
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Parent object, `None` for roots
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Direct children in attachment order
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Attached parts
    pub fn parts(&self) -> &PartStore {
        &self.parts
    }
}
