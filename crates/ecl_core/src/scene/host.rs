//! Host collaborator trait

use super::{ObjectId, Transform};
use crate::ecs::PartStore;
use crate::math::{Quat, Vec3};
use crate::Result;

/// What the world needs from a scene graph
///
/// The trait is object safe; a world holds its host as
/// `Box<dyn SceneHost>`.
pub trait SceneHost {
    /// Create an empty, active, root-level object
    fn create_object(&mut self, name: &str) -> ObjectId;

    /// Create an object from a registered template
    fn instantiate(&mut self, template: &str) -> Result<ObjectId>;

    /// Tear down an object and all of its descendants
    ///
    /// Returns every removed object, the given one first. Unknown objects
    /// yield an empty list.
    fn destroy_object(&mut self, object: ObjectId) -> Vec<ObjectId>;

    /// Check if an object is alive
    fn contains(&self, object: ObjectId) -> bool;

    /// Object name
    fn name(&self, object: ObjectId) -> Option<&str>;

    /// Part store of an object
    fn parts(&self, object: ObjectId) -> Option<&PartStore>;

    /// Part store of an object, mutably
    fn parts_mut(&mut self, object: ObjectId) -> Option<&mut PartStore>;

    /// Local transform of an object
    fn transform(&self, object: ObjectId) -> Option<Transform>;

    /// Set local position and rotation
    fn set_transform(&mut self, object: ObjectId, position: Vec3, rotation: Quat) -> Result<()>;

    /// Re-parent an object, `None` makes it a root
    fn set_parent(&mut self, object: ObjectId, parent: Option<ObjectId>) -> Result<()>;

    /// Parent of an object, `None` for roots and unknown objects
    fn parent(&self, object: ObjectId) -> Option<ObjectId>;

    /// Set the object's own active flag
    fn set_active(&mut self, object: ObjectId, active: bool) -> Result<()>;

    /// Check if an object and all of its ancestors are active
    fn is_active(&self, object: ObjectId) -> bool;

    /// Every live object in creation order
    fn objects(&self) -> Vec<ObjectId>;
}
