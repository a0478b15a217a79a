//! Parts and their per-object storage
//!
//! A part is any `'static` type attached to a scene object. Passive parts
//! (components) only hold data. Active parts (logics) also implement
//! [`Logic`] and advertise it through [`Part::as_logic`], which is how the
//! world finds out that a freshly attached part has to be scheduled.
//!
//! # Example
//!
//! ```rust
//! use ecl_core::ecs::{Logic, LogicContext, Part};
//!
//! #[derive(Default)]
//! struct Health(u32);
//!
//! impl Part for Health {}
//!
//! #[derive(Default)]
//! struct Regenerate;
//!
//! impl Part for Regenerate {
//!     fn as_logic(&mut self) -> Option<&mut dyn Logic> {
//!         Some(self)
//!     }
//! }
//!
//! impl Logic for Regenerate {
//!     fn run(&mut self, ctx: &mut LogicContext<'_>) -> anyhow::Result<()> {
//!         ctx.get_or_add::<Health>()?.0 += 1;
//!         Ok(())
//!     }
//! }
//! ```

use super::Logic;
use crate::{EclError, Result};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Trait for everything that can be attached to an entity
pub trait Part: 'static {
    /// Logic capability of this part
    ///
    /// Logic types return `Some(self)`; plain components keep the default.
    fn as_logic(&mut self) -> Option<&mut dyn Logic> {
        None
    }
}

/// Type-erased view of a part
pub(crate) trait AnyPart: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn logic_mut(&mut self) -> Option<&mut dyn Logic>;
    fn type_name(&self) -> &'static str;
    fn into_any_box(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Part> AnyPart for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn logic_mut(&mut self) -> Option<&mut dyn Logic> {
        Part::as_logic(self)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn into_any_box(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

pub(crate) type BoxedPart = Box<dyn AnyPart>;

enum Slot {
    Present(BoxedPart),
    /// The logic is running and its box lives on the scheduler's stack
    CheckedOut(&'static str),
}

impl Slot {
    fn name(&self) -> &'static str {
        match self {
            Slot::Present(part) => part.type_name(),
            Slot::CheckedOut(name) => *name,
        }
    }
}

/// Description of a logic found in a store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogicInfo {
    /// Part type of the logic
    pub part: TypeId,
    /// Type name of the logic
    pub name: &'static str,
    /// Priority the logic asked for
    pub priority: i8,
}

/// Parts attached to one scene object, at most one per type
///
/// Parts are kept in attachment order, so anything scanning a store (for
/// example adopting the logics of an instantiated template) sees them in
/// the order they were added.
pub struct PartStore {
    slots: IndexMap<TypeId, Slot, FxBuildHasher>,
}

impl Default for PartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.values().map(Slot::name))
            .finish()
    }
}

impl PartStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Check if a part of type `T` is attached (running logics included)
    pub fn contains<T: Part>(&self) -> bool {
        self.contains_type(TypeId::of::<T>())
    }

    /// Check if a part with the given type id is attached
    pub fn contains_type(&self, part: TypeId) -> bool {
        self.slots.contains_key(&part)
    }

    /// Get a part reference
    ///
    /// Returns `None` if the part is absent or is a logic that is running.
    pub fn get<T: Part>(&self) -> Option<&T> {
        match self.slots.get(&TypeId::of::<T>())? {
            Slot::Present(part) => part.as_any().downcast_ref(),
            Slot::CheckedOut(_) => None,
        }
    }

    /// Get a mutable part reference
    pub fn get_mut<T: Part>(&mut self) -> Option<&mut T> {
        match self.slots.get_mut(&TypeId::of::<T>())? {
            Slot::Present(part) => part.as_any_mut().downcast_mut(),
            Slot::CheckedOut(_) => None,
        }
    }

    /// Attach a part unless one of the same type is already there
    ///
    /// Returns `false` and drops `part` if the type is already attached.
    pub fn insert<T: Part>(&mut self, part: T) -> bool {
        let key = TypeId::of::<T>();
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, Slot::Present(Box::new(part)));
        true
    }

    /// Get the part of type `T`, attaching `make()` first if it is absent
    ///
    /// Returns the part and whether it was just attached.
    pub fn get_or_insert_with<T: Part>(
        &mut self,
        make: impl FnOnce() -> T,
    ) -> Result<(&mut T, bool)> {
        let mut inserted = false;
        let slot = self.slots.entry(TypeId::of::<T>()).or_insert_with(|| {
            inserted = true;
            Slot::Present(Box::new(make()))
        });
        match slot {
            Slot::Present(part) => part
                .as_any_mut()
                .downcast_mut::<T>()
                .map(|part| (part, inserted))
                .ok_or(EclError::MissingPart(type_name::<T>())),
            Slot::CheckedOut(name) => Err(EclError::PartInUse(*name)),
        }
    }

    /// Detach and return the part of type `T`
    ///
    /// A running logic is detached as well but cannot be returned; it is
    /// dropped once its `run` hook finishes.
    pub fn remove<T: Part>(&mut self) -> Option<T> {
        match self.slots.shift_remove(&TypeId::of::<T>())? {
            Slot::Present(part) => part.into_any_box().downcast::<T>().ok().map(|part| *part),
            Slot::CheckedOut(_) => None,
        }
    }

    /// Detach the part with the given type id, returns whether one was attached
    pub fn remove_type(&mut self, part: TypeId) -> bool {
        self.slots.shift_remove(&part).is_some()
    }

    /// Check if the part with the given type id is checked out
    pub fn is_checked_out(&self, part: TypeId) -> bool {
        matches!(self.slots.get(&part), Some(Slot::CheckedOut(_)))
    }

    /// Logic description for an attached part, `None` for components
    pub fn logic_info(&mut self, part: TypeId) -> Option<LogicInfo> {
        match self.slots.get_mut(&part)? {
            Slot::Present(boxed) => {
                let name = boxed.type_name();
                let priority = boxed.logic_mut()?.priority();
                Some(LogicInfo {
                    part,
                    name,
                    priority,
                })
            }
            Slot::CheckedOut(_) => None,
        }
    }

    /// All attached logics in attachment order
    pub fn logics(&mut self) -> Vec<LogicInfo> {
        let keys: Vec<TypeId> = self.slots.keys().copied().collect();
        keys.into_iter()
            .filter_map(|part| self.logic_info(part))
            .collect()
    }

    /// Type names of the attached parts in attachment order
    pub fn type_names(&self) -> Vec<&'static str> {
        self.slots.values().map(Slot::name).collect()
    }

    /// Number of attached parts
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Take a part out of its slot, leaving a placeholder behind
    pub(crate) fn check_out(&mut self, part: TypeId) -> Option<BoxedPart> {
        let slot = self.slots.get_mut(&part)?;
        let name = match slot {
            Slot::Present(boxed) => boxed.type_name(),
            Slot::CheckedOut(_) => return None,
        };
        match std::mem::replace(slot, Slot::CheckedOut(name)) {
            Slot::Present(boxed) => Some(boxed),
            Slot::CheckedOut(_) => None,
        }
    }

    /// Put a checked out part back
    ///
    /// Returns `false` (and drops the part) when the slot was removed in the
    /// meantime.
    pub(crate) fn check_in(&mut self, part: TypeId, boxed: BoxedPart) -> bool {
        match self.slots.get_mut(&part) {
            Some(slot @ Slot::CheckedOut(_)) => {
                *slot = Slot::Present(boxed);
                true
            }
            _ => false,
        }
    }
}
