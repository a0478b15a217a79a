//! Scene objects and the host contract
//!
//! The world never owns scene objects. It talks to a [`SceneHost`], which
//! owns the objects, their transforms, their hierarchy and the part store
//! of each object. [`Scene`] is the in-memory host used by the app layer
//! and by tests.

mod host;
mod object;
mod graph;
mod template;

pub use host::SceneHost;
pub use object::{SceneObject, Transform};
pub use graph::Scene;
pub use template::Template;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a scene object owned by a host
    pub struct ObjectId;
}
