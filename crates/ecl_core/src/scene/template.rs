//! Named object templates

use super::SceneObject;
use crate::ecs::{Part, PartStore};

type PartFactory = Box<dyn Fn(&mut PartStore)>;

/// Blueprint for [`Scene::instantiate`](super::Scene)
///
/// Every instantiation gets fresh copies of the template's parts, in the
/// order they were added.
///
/// ```rust
/// use ecl_core::ecs::Part;
/// use ecl_core::scene::Template;
///
/// #[derive(Clone, Default)]
/// struct Health(u32);
///
/// impl Part for Health {}
///
/// let enemy = Template::new("Enemy").with_part(Health(10));
/// assert_eq!(enemy.part_count(), 1);
/// ```
pub struct Template {
    name: String,
    active: bool,
    parts: Vec<PartFactory>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("parts", &self.parts.len())
            .finish()
    }
}

impl Template {
    /// Create an empty template
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            parts: Vec::new(),
        }
    }

    /// Add a part that is cloned into every instance
    pub fn with_part<T: Part + Clone>(mut self, part: T) -> Self {
        self.parts.push(Box::new(move |store| {
            store.insert(part.clone());
        }));
        self
    }

    /// Set whether instances start active
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of parts per instance
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub(crate) fn build(&self) -> SceneObject {
        let mut object = SceneObject::new(self.name.clone());
        object.active = self.active;
        for factory in &self.parts {
            factory(&mut object.parts);
        }
        object
    }
}
