//! In-memory scene graph

use super::{ObjectId, SceneHost, SceneObject, Template, Transform};
use crate::ecs::PartStore;
use crate::math::{Quat, Vec3};
use crate::{EclError, Result};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

/// Scene host backed by a slotmap of objects
///
/// Objects form a forest. Destroying an object destroys its subtree, and
/// an object counts as active only when it and all of its ancestors are.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, SceneObject>,
    /// Creation order, slotmap iteration order is not stable across reuse
    order: Vec<ObjectId>,
    templates: FxHashMap<String, Template>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its own name, replacing any previous one
    pub fn register_template(&mut self, template: Template) {
        tracing::debug!(template = template.name(), "template registered");
        self.templates.insert(template.name().to_owned(), template);
    }

    /// Check if a template is registered
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Get an object
    pub fn object(&self, object: ObjectId) -> Option<&SceneObject> {
        self.objects.get(object)
    }

    /// Direct children of an object
    pub fn children(&self, object: ObjectId) -> &[ObjectId] {
        self.objects
            .get(object)
            .map(|o| o.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.order.push(id);
        id
    }

    fn detach_from_parent(&mut self, object: ObjectId) {
        let Some(parent) = self.objects.get_mut(object).and_then(|o| o.parent.take()) else {
            return;
        };
        if let Some(parent) = self.objects.get_mut(parent) {
            parent.children.retain(|child| *child != object);
        }
    }

    fn is_ancestor(&self, ancestor: ObjectId, object: ObjectId) -> bool {
        let mut current = Some(object);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.objects.get(id).and_then(|o| o.parent);
        }
        false
    }
}

impl SceneHost for Scene {
    fn create_object(&mut self, name: &str) -> ObjectId {
        self.insert(SceneObject::new(name))
    }

    fn instantiate(&mut self, template: &str) -> Result<ObjectId> {
        let object = self
            .templates
            .get(template)
            .ok_or_else(|| EclError::TemplateNotFound(template.to_owned()))?
            .build();
        Ok(self.insert(object))
    }

    fn destroy_object(&mut self, object: ObjectId) -> Vec<ObjectId> {
        if !self.objects.contains_key(object) {
            return Vec::new();
        }
        self.detach_from_parent(object);

        let mut removed = Vec::new();
        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.objects.remove(id) {
                removed.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        self.order.retain(|id| self.objects.contains_key(*id));
        tracing::debug!(?object, count = removed.len(), "objects destroyed");
        removed
    }

    fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains_key(object)
    }

    fn name(&self, object: ObjectId) -> Option<&str> {
        self.objects.get(object).map(|o| o.name.as_str())
    }

    fn parts(&self, object: ObjectId) -> Option<&PartStore> {
        self.objects.get(object).map(|o| &o.parts)
    }

    fn parts_mut(&mut self, object: ObjectId) -> Option<&mut PartStore> {
        self.objects.get_mut(object).map(|o| &mut o.parts)
    }

    fn transform(&self, object: ObjectId) -> Option<Transform> {
        self.objects.get(object).map(|o| o.transform)
    }

    fn set_transform(&mut self, object: ObjectId, position: Vec3, rotation: Quat) -> Result<()> {
        let node = self
            .objects
            .get_mut(object)
            .ok_or(EclError::MissingObject(object))?;
        node.transform = Transform::new(position, rotation);
        Ok(())
    }

    fn set_parent(&mut self, object: ObjectId, parent: Option<ObjectId>) -> Result<()> {
        if !self.objects.contains_key(object) {
            return Err(EclError::MissingObject(object));
        }
        if let Some(parent) = parent {
            if !self.objects.contains_key(parent) {
                return Err(EclError::MissingObject(parent));
            }
            if self.is_ancestor(object, parent) {
                return Err(EclError::InvalidParent { object, parent });
            }
        }

        self.detach_from_parent(object);
        if let Some(parent) = parent {
            if let Some(node) = self.objects.get_mut(parent) {
                node.children.push(object);
            }
            if let Some(node) = self.objects.get_mut(object) {
                node.parent = Some(parent);
            }
        }
        Ok(())
    }

    fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.objects.get(object)?.parent
    }

    fn set_active(&mut self, object: ObjectId, active: bool) -> Result<()> {
        let node = self
            .objects
            .get_mut(object)
            .ok_or(EclError::MissingObject(object))?;
        node.active = active;
        Ok(())
    }

    fn is_active(&self, object: ObjectId) -> bool {
        let mut current = Some(object);
        while let Some(id) = current {
            match self.objects.get(id) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.order.clone()
    }
}
