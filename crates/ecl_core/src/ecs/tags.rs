//! Categorical labels for entity lookup

use smallvec::SmallVec;

/// Integer label used for categorical lookups
///
/// Names for tags live in the application settings; the core only sees the
/// number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u32);

impl From<u32> for Tag {
    fn from(value: u32) -> Self {
        Tag(value)
    }
}

/// Set of tags carried by one entity
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags {
    tags: SmallVec<[Tag; 4]>,
}

impl Tags {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returns `false` if it was already present
    pub fn add(&mut self, tag: Tag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag, returns whether it was present
    pub fn remove(&mut self, tag: Tag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| *t != tag);
        self.tags.len() != before
    }

    /// Check if the tag is present
    pub fn contains(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Iterate over tags in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tags.iter().copied()
    }

    /// Remove every tag
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Tag count
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
