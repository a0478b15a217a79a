//! Entity handles and per-entity records

use super::{Events, Tag, Tags};
use crate::scene::ObjectId;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to one live scene object and the parts attached to it
    ///
    /// Handles are generational: once the entity is destroyed every
    /// operation through an old handle reports `EclError::StaleHandle`.
    pub struct Entity;
}

/// What the world keeps for each entity
///
/// Parts are not stored here; they live on the scene object. Tags and
/// events are created on first mutable access.
#[derive(Debug)]
pub struct EntityRecord {
    object: ObjectId,
    tags: Option<Tags>,
    events: Option<Events>,
}

impl EntityRecord {
    /// Create a record for a scene object
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            tags: None,
            events: None,
        }
    }

    /// The scene object behind the entity
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Tags, if any were ever added
    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    /// Tags, created on first access
    pub fn tags_mut(&mut self) -> &mut Tags {
        self.tags.get_or_insert_with(Tags::new)
    }

    /// Event dispatcher, if one was ever created
    pub fn events(&self) -> Option<&Events> {
        self.events.as_ref()
    }

    /// Event dispatcher, created on first access
    pub fn events_mut(&mut self) -> &mut Events {
        self.events.get_or_insert_with(Events::new)
    }

    /// Event dispatcher, mutably, without creating it
    pub fn events_if_created(&mut self) -> Option<&mut Events> {
        self.events.as_mut()
    }

    /// Check for a tag without creating the tag set
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.as_ref().is_some_and(|tags| tags.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_sub_objects_are_lazy() {
        let mut objects: SlotMap<ObjectId, ()> = SlotMap::with_key();
        let mut record = EntityRecord::new(objects.insert(()));

        assert!(record.tags().is_none());
        assert!(record.events().is_none());
        assert!(!record.has_tag(Tag(1)));

        record.tags_mut().add(Tag(1));
        assert!(record.has_tag(Tag(1)));
        assert!(record.events().is_none());

        record.events_mut();
        assert!(record.events().is_some());
    }
}
